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

//! Log sinks.
//!
//! Records leave the plugin through a single transform function, [`LogFn`].
//! When the caller hands in a [`Logger`] object instead, the function
//! dispatches on the level to the matching logger method.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::LogOptions;
use crate::record::LogRecord;

/// Levels the plugin emits records at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

/// Transform function receiving `(level, structured fields, message)`.
pub type LogFn = Arc<dyn Fn(LogLevel, &LogRecord, &str) + Send + Sync>;

/// Logger object with one method per level.
///
/// Implementations must be safe to call concurrently: publish confirmations
/// and deliveries may be logged from different threads at the same time.
#[cfg_attr(test, mockall::automock)]
pub trait Logger: Send + Sync {
    fn debug(&self, record: &LogRecord, message: &str);

    fn info(&self, record: &LogRecord, message: &str);

    fn warn(&self, record: &LogRecord, message: &str);
}

/// Default logger, forwards records to `tracing` under the `amqp_log` target.
///
/// The structured fields are attached as one JSON encoded `record` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    fn render(record: &LogRecord) -> String {
        record
            .to_value()
            .map(|value| value.to_string())
            .unwrap_or_else(|e| format!("<unserializable record: {e}>"))
    }
}

impl Logger for TracingLogger {
    fn debug(&self, record: &LogRecord, message: &str) {
        debug!(target: "amqp_log", record = %Self::render(record), "{}", message);
    }

    fn info(&self, record: &LogRecord, message: &str) {
        info!(target: "amqp_log", record = %Self::render(record), "{}", message);
    }

    fn warn(&self, record: &LogRecord, message: &str) {
        warn!(target: "amqp_log", record = %Self::render(record), "{}", message);
    }
}

/// Wraps a logger object into a transform function.
pub fn dispatch_to(logger: Arc<dyn Logger>) -> LogFn {
    Arc::new(move |level, record, message| match level {
        LogLevel::Debug => logger.debug(record, message),
        LogLevel::Info => logger.info(record, message),
        LogLevel::Warn => logger.warn(record, message),
    })
}

/// Picks the sink: `log` first, then `logger`, then [`TracingLogger`].
pub(crate) fn resolve(options: &LogOptions) -> LogFn {
    if let Some(log) = &options.log {
        return log.clone();
    }
    let logger = options
        .logger
        .clone()
        .unwrap_or_else(|| Arc::new(TracingLogger) as Arc<dyn Logger>);
    dispatch_to(logger)
}
