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

use amqp_log_error::AmqpLogResult;
use tracing::debug;

use crate::connection::ConnectTarget;
use crate::connection::SharedConnectionFields;
use crate::host::Connector;
use crate::host::SocketOptions;

/// Connect primitive that records the target protocol before connecting.
pub struct LoggedConnector<C> {
    inner: C,
    fields: SharedConnectionFields,
}

impl<C> LoggedConnector<C> {
    pub(crate) fn new(inner: C, fields: SharedConnectionFields) -> Self {
        Self { inner, fields }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Connector> Connector for LoggedConnector<C> {
    type Connection = C::Connection;

    fn connect(&self, target: &ConnectTarget, socket_options: &SocketOptions) -> AmqpLogResult<Self::Connection> {
        self.fields.write().extract_protocol(target)?;
        debug!(target = ?target, "connecting to AMQP broker");
        self.inner.connect(target, socket_options)
    }
}
