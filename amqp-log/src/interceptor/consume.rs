// Copyright 2023 The RocketMQ Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use amqp_log_error::AmqpLogResult;

use crate::host::ConsumeOk;
use crate::host::Consumer;
use crate::host::MessageHandler;
use crate::interceptor::Recorder;
use crate::message::ConsumeOptions;
use crate::message::Message;

/// Consume primitive whose handler logs every delivery before running the
/// caller's handler with the unmodified message.
pub struct LoggedConsumer<C> {
    inner: C,
    recorder: Arc<Recorder>,
}

impl<C> LoggedConsumer<C> {
    pub(crate) fn new(inner: C, recorder: Arc<Recorder>) -> Self {
        Self { inner, recorder }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Consumer> Consumer for LoggedConsumer<C> {
    fn consume(&self, queue: &str, handler: MessageHandler, options: &ConsumeOptions) -> AmqpLogResult<ConsumeOk> {
        let recorder = self.recorder.clone();
        let subscribe_options = options.clone();
        let logged: MessageHandler = Arc::new(move |message: Message| {
            recorder.log_event(recorder.delivered(&message, &subscribe_options));
            handler(message)
        });
        self.inner.consume(queue, logged, options)
    }
}
