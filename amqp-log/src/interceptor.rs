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

//! Wrappers installed at the host's extension points.
//!
//! Every wrapper shares one [`Recorder`]: the connection fields of the plugin,
//! the resolved sink and the preview settings. Records are built inside a
//! fallible step; a failure there becomes a single `warn` record and never
//! reaches the wrapped operation.

pub mod connect;
pub mod consume;
pub mod publish;
pub mod send_hook;

use amqp_log_error::AmqpLogError;
use amqp_log_error::AmqpLogResult;
use tracing::debug;

use crate::args::PublishFields;
use crate::config::BodyConfig;
use crate::config::LogOptions;
use crate::config::MessageFormat;
use crate::connection::ConnectionFields;
use crate::connection::SharedConnectionFields;
use crate::message::ConsumeOptions;
use crate::message::Content;
use crate::message::Message;
use crate::message::MessageProperties;
use crate::preview::preview_content;
use crate::record::Command;
use crate::record::LogRecord;
use crate::record::LoggedProperties;
use crate::record::DELIVERED_MESSAGE;
use crate::record::LOGGING_FAILED_MESSAGE;
use crate::record::PUBLISHED_MESSAGE;
use crate::sink;
use crate::sink::LogFn;
use crate::sink::LogLevel;

pub(crate) struct Recorder {
    fields: SharedConnectionFields,
    log: LogFn,
    body: BodyConfig,
    message_format: MessageFormat,
}

impl Recorder {
    pub(crate) fn new(fields: SharedConnectionFields, options: &LogOptions) -> Self {
        Self {
            fields,
            log: sink::resolve(options),
            body: options.body,
            message_format: options.message_format,
        }
    }

    pub(crate) fn emit(&self, level: LogLevel, record: &LogRecord, message: &str) {
        (self.log)(level, record, message)
    }

    pub(crate) fn connection_fields(&self) -> ConnectionFields {
        self.fields.read().clone()
    }

    fn message_for(&self, command: Command, exchange: &str, routing_key: &str, connection: &ConnectionFields) -> String {
        match (self.message_format, command) {
            (MessageFormat::AccessLog, _) => connection.access_log_line(command, exchange, routing_key),
            (MessageFormat::Plain, Command::Publish) => PUBLISHED_MESSAGE.to_string(),
            (MessageFormat::Plain, Command::Consume) => DELIVERED_MESSAGE.to_string(),
        }
    }

    pub(crate) fn published(
        &self,
        fields: &PublishFields,
        properties: MessageProperties,
        content: &Content,
        err: Option<&AmqpLogError>,
    ) -> AmqpLogResult<(LogRecord, String)> {
        let connection = self.connection_fields();
        let message = self.message_for(
            Command::Publish,
            fields.exchange.as_str(),
            fields.routing_key.as_str(),
            &connection,
        );
        let content = preview_content(content, &self.body)?;
        let record = LogRecord {
            connection,
            command: Some(Command::Publish),
            exchange: Some(fields.exchange.clone()),
            routing_key: Some(fields.routing_key.clone()),
            properties: Some(LoggedProperties::published(properties, fields)),
            content,
            err: err.map(ToString::to_string),
            ..Default::default()
        };
        Ok((record, message))
    }

    pub(crate) fn delivered(&self, message: &Message, options: &ConsumeOptions) -> AmqpLogResult<(LogRecord, String)> {
        let connection = self.connection_fields();
        let text = self.message_for(
            Command::Consume,
            message.fields.exchange.as_str(),
            message.fields.routing_key.as_str(),
            &connection,
        );
        let content = preview_content(&message.content, &self.body)?;
        let record = LogRecord {
            connection,
            command: Some(Command::Consume),
            exchange: Some(message.fields.exchange.clone()),
            routing_key: Some(message.fields.routing_key.clone()),
            properties: Some(message.properties.clone().into()),
            fields: Some(message.fields.clone()),
            options: Some(options.clone()),
            content,
            ..Default::default()
        };
        Ok((record, text))
    }

    /// Emits a built event record at `info`, or the failure at `warn`.
    pub(crate) fn log_event(&self, built: AmqpLogResult<(LogRecord, String)>) {
        match built {
            Ok((record, message)) => self.emit(LogLevel::Info, &record, &message),
            Err(e) => {
                debug!(error = %e, "building AMQP log record failed");
                self.emit(LogLevel::Warn, &LogRecord::failure(&e), LOGGING_FAILED_MESSAGE);
            }
        }
    }
}
