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

//! Structured log record handed to the sink.

use amqp_log_error::AmqpLogResult;
use cheetah_string::CheetahString;
use serde::Serialize;
use serde_json::Value;

use crate::args::PublishFields;
use crate::connection::ConnectionFields;
use crate::message::ConsumeOptions;
use crate::message::DeliveryFields;
use crate::message::MessageProperties;
use crate::message::ServerProperties;

pub const CONNECTED_MESSAGE: &str = "Connected to broker.";
pub const PUBLISHED_MESSAGE: &str = "Message published.";
pub const DELIVERED_MESSAGE: &str = "Message delivered.";
pub const LOGGING_FAILED_MESSAGE: &str = "[AMQP:log] Message logging failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Publish,
    Consume,
}

/// Properties as logged: the message properties plus, on publish records,
/// the basic.publish flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoggedProperties {
    #[serde(flatten)]
    pub message: MessageProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandatory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immediate: Option<bool>,
}

impl LoggedProperties {
    pub fn published(message: MessageProperties, fields: &PublishFields) -> Self {
        Self {
            message,
            mandatory: Some(fields.mandatory),
            immediate: Some(fields.immediate),
        }
    }
}

impl From<MessageProperties> for LoggedProperties {
    fn from(message: MessageProperties) -> Self {
        Self {
            message,
            ..Default::default()
        }
    }
}

/// One log event: the current connection fields plus event specific fields.
///
/// Absent fields are skipped when serialized, so a record rendered with
/// [`LogRecord::to_value`] only carries the keys that apply to its event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(flatten)]
    pub connection: ConnectionFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_key: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<LoggedProperties>,
    /// Raw delivery fields, consume records only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<DeliveryFields>,
    /// Consume options, consume records only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ConsumeOptions>,
    /// Content preview, see [`crate::preview`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_properties: Option<ServerProperties>,
}

impl LogRecord {
    /// Record emitted once the broker handshake completed.
    pub fn connected(connection: ConnectionFields, server_properties: ServerProperties) -> Self {
        Self {
            connection,
            server_properties: Some(server_properties),
            ..Default::default()
        }
    }

    /// Record emitted in place of an event record that could not be built.
    pub fn failure(err: impl ToString) -> Self {
        Self {
            err: Some(err.to_string()),
            ..Default::default()
        }
    }

    pub fn to_value(&self) -> AmqpLogResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
