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

//! The logging plugin.

use std::fmt;
use std::sync::Arc;

use amqp_log_error::AmqpLogResult;
use parking_lot::Mutex;
use parking_lot::RwLock;
use tracing::debug;
use tracing::warn;

use crate::config::IntegrationStrategy;
use crate::config::LogOptions;
use crate::connection::ConnectionFields;
use crate::connection::SharedConnectionFields;
use crate::host::ConnectionInfo;
use crate::host::Plugin;
use crate::host::Scope;
use crate::interceptor::connect::LoggedConnector;
use crate::interceptor::consume::LoggedConsumer;
use crate::interceptor::publish::LoggedPublisher;
use crate::interceptor::send_hook::LoggingSendHook;
use crate::interceptor::send_hook::SendHookRegistration;
use crate::interceptor::Recorder;
use crate::record::LogRecord;
use crate::record::CONNECTED_MESSAGE;
use crate::sink::LogLevel;

pub const PLUGIN_NAME: &str = "log";

/// Logging interceptor for one connection.
///
/// The host calls [`Plugin::init`], then wraps its primitives for the scopes
/// listed by [`Plugin::scopes`] and calls [`LogPlugin::on_open`] once the
/// connection is established.
///
/// ```rust
/// use amqp_log::LogOptions;
/// use amqp_log::LogPlugin;
/// use amqp_log::Plugin;
/// use amqp_log::Scope;
///
/// let mut plugin = LogPlugin::new(LogOptions::from_fn(|level, record, message| {
///     println!("{level}: {message} {:?}", record.to_value());
/// }));
/// plugin.init().unwrap();
/// assert!(plugin.scopes().contains(&Scope::Publication));
/// plugin.destroy();
/// ```
pub struct LogPlugin {
    options: LogOptions,
    fields: SharedConnectionFields,
    recorder: Arc<Recorder>,
    scopes: Vec<Scope>,
    hooks: Vec<Scope>,
    registration: Mutex<Option<SendHookRegistration>>,
}

impl LogPlugin {
    pub fn new(options: impl Into<LogOptions>) -> Self {
        let options = options.into();
        let fields: SharedConnectionFields = Arc::new(RwLock::new(ConnectionFields::default()));
        let recorder = Arc::new(Recorder::new(fields.clone(), &options));
        Self {
            options,
            fields,
            recorder,
            scopes: Vec::new(),
            hooks: Vec::new(),
            registration: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &LogOptions {
        &self.options
    }

    /// Snapshot of the current connection fields.
    pub fn connection_fields(&self) -> ConnectionFields {
        self.fields.read().clone()
    }

    /// Wraps the connect primitive (connection scope).
    pub fn wrap_connector<C>(&self, connector: C) -> LoggedConnector<C> {
        LoggedConnector::new(connector, self.fields.clone())
    }

    /// Wraps the publish primitive (publication scope).
    pub fn wrap_publisher<P>(&self, publisher: P) -> LoggedPublisher<P> {
        LoggedPublisher::new(publisher, self.recorder.clone())
    }

    /// Wraps the consume primitive (subscription scope).
    pub fn wrap_consumer<C>(&self, consumer: C) -> LoggedConsumer<C> {
        LoggedConsumer::new(consumer, self.recorder.clone())
    }

    /// Connection open hook.
    ///
    /// Logs the broker handshake at `debug`, then records socket and broker
    /// fields. With [`IntegrationStrategy::PatchBased`] it also registers the
    /// logging send hook on the connection, replacing any earlier one.
    pub fn on_open(&self, connection: &dyn ConnectionInfo) {
        if self.options.strategy == IntegrationStrategy::PatchBased {
            self.register_send_hook(connection);
        }

        let server_properties = connection.server_properties().clone();
        let record = LogRecord::connected(self.connection_fields(), server_properties);
        self.recorder.emit(LogLevel::Debug, &record, CONNECTED_MESSAGE);

        self.fields.write().populate(connection);
    }

    /// Whether a send hook is currently registered.
    pub fn has_send_hook(&self) -> bool {
        self.registration
            .lock()
            .as_ref()
            .is_some_and(SendHookRegistration::is_active)
    }

    fn register_send_hook(&self, connection: &dyn ConnectionInfo) {
        let Some(registry) = connection.send_hooks() else {
            warn!("connection exposes no send hook registry, publishes will not be logged");
            return;
        };
        let hook = Arc::new(LoggingSendHook::new(self.recorder.clone()));
        let registration = SendHookRegistration::register(registry, hook);
        if let Some(mut previous) = self.registration.lock().replace(registration) {
            if let Err(e) = previous.release() {
                warn!(error = %e, "failed to release previous send hook");
            }
        }
    }

    fn release_send_hook(&self) {
        if let Some(mut registration) = self.registration.lock().take() {
            if let Err(e) = registration.release() {
                warn!(error = %e, "failed to release send hook");
            }
        }
    }
}

impl Plugin for LogPlugin {
    fn plugin_name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn init(&mut self) -> AmqpLogResult<()> {
        self.scopes = match self.options.strategy {
            IntegrationStrategy::HookBased => vec![Scope::Connection, Scope::Publication, Scope::Subscription],
            IntegrationStrategy::PatchBased => vec![Scope::Connection, Scope::Subscription],
        };
        self.hooks = vec![Scope::Connection];
        debug!(strategy = %self.options.strategy, scopes = ?self.scopes, "log plugin initialized");
        Ok(())
    }

    fn destroy(&mut self) {
        self.release_send_hook();
        debug!("log plugin destroyed");
    }

    fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    fn hooks(&self) -> &[Scope] {
        &self.hooks
    }
}

impl Default for LogPlugin {
    fn default() -> Self {
        Self::new(LogOptions::default())
    }
}

impl fmt::Debug for LogPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogPlugin")
            .field("options", &self.options)
            .field("fields", &*self.fields.read())
            .field("scopes", &self.scopes)
            .field("hooks", &self.hooks)
            .field("has_send_hook", &self.has_send_hook())
            .finish()
    }
}
