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

use amqp_log_error::AmqpLogError;

use crate::args::normalize_publish;
use crate::host::PublishCallback;
use crate::host::Publisher;
use crate::interceptor::Recorder;
use crate::message::Content;
use crate::message::PublishOptions;

/// Publish primitive that logs every publish at `info`.
///
/// Without a callback the record is emitted right after the inner publish
/// returns. With a callback the caller's callback runs first and the record,
/// carrying the transport error if any, is emitted after it.
pub struct LoggedPublisher<P> {
    inner: P,
    recorder: Arc<Recorder>,
}

impl<P> LoggedPublisher<P> {
    pub(crate) fn new(inner: P, recorder: Arc<Recorder>) -> Self {
        Self { inner, recorder }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Publisher> Publisher for LoggedPublisher<P> {
    fn publish(&self, exchange: &str, routing_key: &str, content: &Content, options: &PublishOptions) -> bool {
        let ok = self.inner.publish(exchange, routing_key, content, options);
        log_publish(&self.recorder, exchange, routing_key, content, options, None);
        ok
    }

    fn publish_with_callback(
        &self,
        exchange: &str,
        routing_key: &str,
        content: &Content,
        options: &PublishOptions,
        callback: PublishCallback,
    ) -> bool {
        let recorder = self.recorder.clone();
        let exchange_owned = exchange.to_string();
        let routing_key_owned = routing_key.to_string();
        let content_owned = content.clone();
        let options_owned = options.clone();
        let logged: PublishCallback = Box::new(move |err: Option<&AmqpLogError>| {
            callback(err);
            log_publish(
                &recorder,
                &exchange_owned,
                &routing_key_owned,
                &content_owned,
                &options_owned,
                err,
            );
        });
        self.inner
            .publish_with_callback(exchange, routing_key, content, options, logged)
    }
}

fn log_publish(
    recorder: &Recorder,
    exchange: &str,
    routing_key: &str,
    content: &Content,
    options: &PublishOptions,
    err: Option<&AmqpLogError>,
) {
    let built = normalize_publish(exchange, routing_key, options)
        .and_then(|args| recorder.published(&args.fields, args.properties, content, err));
    recorder.log_event(built);
}
