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

//! # amqp-log
//!
//! Structured logging interceptor for AMQP 0-9-1 clients.
//!
//! The plugin hooks into three extension points of a host framework:
//! connecting, publishing and consuming. At each one it builds a
//! [`LogRecord`] (connection fields, exchange, routing key, properties,
//! optional content preview) and forwards it to a caller supplied sink, then
//! delegates to the wrapped operation. Logging never changes the outcome of
//! the wrapped operation: a record that cannot be built is replaced by a
//! single `warn` record.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use amqp_log::ConnectTarget;
//! use amqp_log::Connector;
//! use amqp_log::LogOptions;
//! use amqp_log::LogPlugin;
//! use amqp_log::Plugin;
//! use amqp_log::SocketOptions;
//! use amqp_log_error::AmqpLogResult;
//!
//! struct Noop;
//!
//! impl Connector for Noop {
//!     type Connection = ();
//!
//!     fn connect(&self, _: &ConnectTarget, _: &SocketOptions) -> AmqpLogResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! let mut plugin = LogPlugin::new(LogOptions::builder().enable_body(1000).build());
//! plugin.init().unwrap();
//! let connector = plugin.wrap_connector(Noop);
//! connector
//!     .connect(&ConnectTarget::from("amqp://localhost:5672/%2f"), &SocketOptions::default())
//!     .unwrap();
//! assert_eq!(plugin.connection_fields().protocol.unwrap().as_str(), "amqp");
//! ```

pub mod args;
pub mod config;
pub mod connection;
pub mod hook;
pub mod host;
pub mod interceptor;
pub mod log;
pub mod message;
pub mod plugin;
pub mod preview;
pub mod record;
pub mod sink;

pub use crate::config::BodyConfig;
pub use crate::config::IntegrationStrategy;
pub use crate::config::LogOptions;
pub use crate::config::LogSettings;
pub use crate::config::MessageFormat;
pub use crate::connection::ConnectTarget;
pub use crate::connection::ConnectionFields;
pub use crate::host::ConnectionInfo;
pub use crate::host::Connector;
pub use crate::host::Consumer;
pub use crate::host::Plugin;
pub use crate::host::Publisher;
pub use crate::host::Scope;
pub use crate::host::SocketOptions;
pub use crate::message::Content;
pub use crate::message::Message;
pub use crate::plugin::LogPlugin;
pub use crate::record::Command;
pub use crate::record::LogRecord;
pub use crate::record::LoggedProperties;
pub use crate::sink::LogLevel;
pub use crate::sink::Logger;
