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

//! Plugin configuration.
//!
//! [`LogOptions`] is what the plugin is constructed with. The part of it that
//! can live in a file is [`LogSettings`], loadable through the `config` crate.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use amqp_log_error::AmqpLogResult;
use config::Config;
use serde::Deserialize;
use serde::Serialize;

use crate::record::LogRecord;
use crate::sink::LogFn;
use crate::sink::LogLevel;
use crate::sink::Logger;

pub const DEFAULT_BODY_MAX_BYTES: usize = 1000;

/// Controls the content preview attached to publish and consume records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub enabled: bool,
    #[serde(alias = "maxBytes")]
    pub max_bytes: usize,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_bytes: DEFAULT_BODY_MAX_BYTES,
        }
    }
}

impl BodyConfig {
    pub fn enabled(max_bytes: usize) -> Self {
        Self {
            enabled: true,
            max_bytes,
        }
    }
}

/// How publishes are observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntegrationStrategy {
    /// Wrap the publish primitive exposed by the host framework.
    #[default]
    HookBased,
    /// Register a send hook on the connection's frame-send path.
    PatchBased,
}

/// Wording of the human readable message attached to publish/consume records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageFormat {
    /// `<remote> - "<command> : <exchange> -> <routing key> AMQP/<version>" "<system>"`
    #[default]
    AccessLog,
    /// `Message published.` / `Message delivered.`
    Plain,
}

/// File-loadable settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub body: BodyConfig,
    pub strategy: IntegrationStrategy,
    pub message_format: MessageFormat,
}

impl LogSettings {
    /// Loads settings from a TOML, YAML or JSON file, picked by extension.
    pub fn from_file(path: impl AsRef<Path>) -> AmqpLogResult<Self> {
        let cfg = Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        let settings = cfg.try_deserialize::<LogSettings>()?;
        Ok(settings)
    }
}

/// Construction options of the logging plugin.
///
/// Either a single transform function (see [`LogOptions::from_fn`]) or a set
/// of optional parts: a transform function `log`, a `logger` object, and the
/// content preview settings. `log` takes precedence over `logger`; without
/// either, records go to [`crate::sink::TracingLogger`].
#[derive(Clone, Default)]
pub struct LogOptions {
    pub log: Option<LogFn>,
    pub logger: Option<Arc<dyn Logger>>,
    pub body: BodyConfig,
    pub strategy: IntegrationStrategy,
    pub message_format: MessageFormat,
}

impl LogOptions {
    pub fn from_fn<F>(log: F) -> Self
    where
        F: Fn(LogLevel, &LogRecord, &str) + Send + Sync + 'static,
    {
        Self {
            log: Some(Arc::new(log)),
            ..Default::default()
        }
    }

    pub fn builder() -> LogOptionsBuilder {
        LogOptionsBuilder::default()
    }

    pub fn settings(&self) -> LogSettings {
        LogSettings {
            body: self.body,
            strategy: self.strategy,
            message_format: self.message_format,
        }
    }
}

impl<F> From<F> for LogOptions
where
    F: Fn(LogLevel, &LogRecord, &str) + Send + Sync + 'static,
{
    fn from(log: F) -> Self {
        Self::from_fn(log)
    }
}

impl From<LogSettings> for LogOptions {
    fn from(settings: LogSettings) -> Self {
        LogOptions::builder().settings(settings).build()
    }
}

impl fmt::Debug for LogOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogOptions")
            .field("log", &self.log.as_ref().map(|_| "Fn"))
            .field("logger", &self.logger.as_ref().map(|_| "Logger"))
            .field("body", &self.body)
            .field("strategy", &self.strategy)
            .field("message_format", &self.message_format)
            .finish()
    }
}

/// Builder for [`LogOptions`]
///
/// # Example
///
/// ```rust
/// use amqp_log::config::IntegrationStrategy;
/// use amqp_log::config::LogOptions;
///
/// let options = LogOptions::builder()
///     .log(|level, record, message| println!("{level} {message} {:?}", record.command))
///     .enable_body(4096)
///     .strategy(IntegrationStrategy::PatchBased)
///     .build();
/// assert!(options.body.enabled);
/// ```
#[derive(Default)]
pub struct LogOptionsBuilder {
    options: LogOptions,
}

impl LogOptionsBuilder {
    /// Sets the transform function every record is handed to
    pub fn log<F>(mut self, log: F) -> Self
    where
        F: Fn(LogLevel, &LogRecord, &str) + Send + Sync + 'static,
    {
        self.options.log = Some(Arc::new(log));
        self
    }

    /// Sets the logger object used when no transform function is given
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.options.logger = Some(logger);
        self
    }

    pub fn body(mut self, body: BodyConfig) -> Self {
        self.options.body = body;
        self
    }

    /// Enables content preview for payloads up to `max_bytes`
    pub fn enable_body(mut self, max_bytes: usize) -> Self {
        self.options.body = BodyConfig::enabled(max_bytes);
        self
    }

    pub fn strategy(mut self, strategy: IntegrationStrategy) -> Self {
        self.options.strategy = strategy;
        self
    }

    pub fn message_format(mut self, message_format: MessageFormat) -> Self {
        self.options.message_format = message_format;
        self
    }

    /// Applies file-loaded settings, keeping `log` and `logger`
    pub fn settings(mut self, settings: LogSettings) -> Self {
        self.options.body = settings.body;
        self.options.strategy = settings.strategy;
        self.options.message_format = settings.message_format;
        self
    }

    pub fn build(self) -> LogOptions {
        self.options
    }
}
