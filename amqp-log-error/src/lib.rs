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

//! # amqp-log error handling
//!
//! Unified error type shared by the AMQP logging interceptor and the host
//! contracts it wraps.
//!
//! ```rust
//! use amqp_log_error::AmqpLogError;
//! use amqp_log_error::AmqpLogResult;
//!
//! fn connect(url: &str) -> AmqpLogResult<()> {
//!     if url.is_empty() {
//!         return Err(AmqpLogError::invalid_url(url, "empty url"));
//!     }
//!     Ok(())
//! }
//! # connect("amqp://localhost").unwrap();
//! ```

mod serialization;

pub use serialization::SerializationError;
use thiserror::Error;

/// Result alias used across the workspace
pub type AmqpLogResult<T> = std::result::Result<T, AmqpLogError>;

/// Main error type for interceptor and transport contract operations
#[derive(Debug, Error)]
pub enum AmqpLogError {
    // ============================================================================
    // Connection target errors
    // ============================================================================
    /// The connect target could not be parsed
    #[error("Invalid connection url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    // ============================================================================
    // Serialization Errors
    // ============================================================================
    /// Record construction failed while encoding or decoding message data
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// Error reported by the underlying broker client
    #[error("Transport operation '{operation}' failed: {message}")]
    Transport { operation: &'static str, message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unregistering a send hook that is not (or no longer) registered
    #[error("Send hook is not registered")]
    HookNotRegistered,
}

impl AmqpLogError {
    /// Create an invalid url error
    #[inline]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a transport error
    #[inline]
    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the error was produced while building a log record
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization(_) | Self::Json(_))
    }
}

impl From<config::ConfigError> for AmqpLogError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<std::str::Utf8Error> for AmqpLogError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::Serialization(SerializationError::Utf8Error(e))
    }
}
