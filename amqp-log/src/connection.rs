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

//! Connection metadata attached to every record.

use std::sync::Arc;

use amqp_log_error::AmqpLogError;
use amqp_log_error::AmqpLogResult;
use cheetah_string::CheetahString;
use parking_lot::RwLock;
use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::host::ConnectionInfo;
use crate::record::Command;

/// AMQP protocol revision spoken by the client.
pub const PROTOCOL_VERSION: &str = "0.9.1";

/// Connection fields, written at connect and open, read by every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_address: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_port: Option<u16>,
    /// `"<product> <version>"` reported by the broker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<CheetahString>,
}

/// Connection fields shared between the plugin and its wrappers.
pub type SharedConnectionFields = Arc<RwLock<ConnectionFields>>;

/// Structured connection target, the alternative to a URL string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTarget {
    pub protocol: String,
    pub hostname: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub vhost: Option<String>,
    #[serde(default)]
    pub heartbeat: Option<u16>,
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        Self {
            protocol: "amqp".to_string(),
            hostname: "localhost".to_string(),
            port: 5672,
            username: None,
            password: None,
            vhost: None,
            heartbeat: None,
        }
    }
}

/// What the host's connect primitive is called with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectTarget {
    Url(String),
    Structured(ConnectionTarget),
}

impl From<&str> for ConnectTarget {
    fn from(url: &str) -> Self {
        ConnectTarget::Url(url.to_string())
    }
}

impl From<String> for ConnectTarget {
    fn from(url: String) -> Self {
        ConnectTarget::Url(url)
    }
}

impl From<ConnectionTarget> for ConnectTarget {
    fn from(target: ConnectionTarget) -> Self {
        ConnectTarget::Structured(target)
    }
}

impl ConnectionFields {
    /// Stores the protocol of `target`.
    ///
    /// Structured targets are taken verbatim; URL strings are parsed and their
    /// scheme is stored. Unparseable URLs are returned as errors and leave the
    /// fields untouched.
    pub fn extract_protocol(&mut self, target: &ConnectTarget) -> AmqpLogResult<()> {
        let protocol = match target {
            ConnectTarget::Structured(target) => target.protocol.clone(),
            ConnectTarget::Url(url) => {
                let parsed = Url::parse(url).map_err(|e| AmqpLogError::invalid_url(url.as_str(), e.to_string()))?;
                parsed.scheme().to_string()
            }
        };
        self.protocol = Some(CheetahString::from_string(protocol));
        Ok(())
    }

    /// Fills the socket and broker fields from an open connection.
    pub fn populate(&mut self, connection: &dyn ConnectionInfo) {
        self.protocol_version = Some(CheetahString::from_static_str(PROTOCOL_VERSION));
        if let Some(local) = connection.local_addr() {
            self.local_address = Some(CheetahString::from_string(local.ip().to_string()));
            self.local_port = Some(local.port());
        }
        if let Some(peer) = connection.peer_addr() {
            self.remote_address = Some(CheetahString::from_string(peer.ip().to_string()));
            self.remote_port = Some(peer.port());
        }
        self.system = Some(CheetahString::from_string(connection.server_properties().system()));
    }

    /// Access log style line for a publish or consume event.
    pub fn access_log_line(&self, command: Command, exchange: &str, routing_key: &str) -> String {
        let exchange = if exchange.is_empty() { "<default>" } else { exchange };
        format!(
            "{} - \"{} : {} -> {} AMQP/{}\" \"{}\"",
            display_or_dash(self.remote_address.as_ref()),
            command,
            exchange,
            routing_key,
            display_or_dash(self.protocol_version.as_ref()),
            display_or_dash(self.system.as_ref()),
        )
    }
}

fn display_or_dash(value: Option<&CheetahString>) -> &str {
    value.map(|v| v.as_str()).unwrap_or("-")
}
