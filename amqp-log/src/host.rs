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

//! Contracts of the host plugin framework and the underlying broker client.
//!
//! The interceptor never talks to a broker itself. The host implements these
//! traits over its client and calls the plugin at the extension points named
//! by [`Scope`].

use std::net::SocketAddr;
use std::sync::Arc;

use amqp_log_error::AmqpLogError;
use amqp_log_error::AmqpLogResult;
use cheetah_string::CheetahString;
use serde::Deserialize;
use serde::Serialize;

use crate::connection::ConnectTarget;
use crate::hook::send_hook_registry::SendHookRegistry;
use crate::message::ConsumeOptions;
use crate::message::Content;
use crate::message::Message;
use crate::message::PublishOptions;
use crate::message::ServerProperties;

/// Extension points of the host framework.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Scope {
    Connection,
    Publication,
    Subscription,
}

/// Lifecycle every host plugin goes through.
pub trait Plugin: Send + Sync {
    fn plugin_name(&self) -> &'static str;

    /// Called once when the plugin is registered with the host.
    fn init(&mut self) -> AmqpLogResult<()>;

    /// Called when the host shuts down; releases whatever `init` and the
    /// connection hooks acquired.
    fn destroy(&mut self);

    /// Scopes whose primitive the plugin wraps.
    fn scopes(&self) -> &[Scope];

    /// Scopes at which the plugin observes lifecycle events.
    fn hooks(&self) -> &[Scope];
}

/// Socket level options passed through to the client's connect primitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocketOptions {
    pub timeout_ms: Option<u64>,
    pub no_delay: bool,
    pub keep_alive: bool,
}

/// The client's connect primitive.
pub trait Connector: Send + Sync {
    type Connection;

    fn connect(&self, target: &ConnectTarget, socket_options: &SocketOptions) -> AmqpLogResult<Self::Connection>;
}

/// What an established connection exposes about itself.
pub trait ConnectionInfo: Send + Sync {
    fn local_addr(&self) -> Option<SocketAddr>;

    fn peer_addr(&self) -> Option<SocketAddr>;

    fn server_properties(&self) -> &ServerProperties;

    /// Registry of hooks run on every basic.publish frame send, if the client
    /// offers one.
    fn send_hooks(&self) -> Option<Arc<dyn SendHookRegistry>> {
        None
    }
}

/// Completion callback of a confirmed publish, error first.
pub type PublishCallback = Box<dyn FnOnce(Option<&AmqpLogError>) + Send>;

/// The client's publish primitive.
pub trait Publisher: Send + Sync {
    /// Fire and forget publish. The returned flag is the client's write
    /// buffer state, `false` asks the caller to back off.
    fn publish(&self, exchange: &str, routing_key: &str, content: &Content, options: &PublishOptions) -> bool;

    /// Publish whose outcome is reported through `callback`, possibly from
    /// another thread.
    fn publish_with_callback(
        &self,
        exchange: &str,
        routing_key: &str,
        content: &Content,
        options: &PublishOptions,
        callback: PublishCallback,
    ) -> bool;
}

/// Handler invoked once per delivered message.
pub type MessageHandler = Arc<dyn Fn(Message) + Send + Sync>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumeOk {
    pub consumer_tag: CheetahString,
}

/// The client's consume primitive.
pub trait Consumer: Send + Sync {
    fn consume(&self, queue: &str, handler: MessageHandler, options: &ConsumeOptions) -> AmqpLogResult<ConsumeOk>;
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn scopes_enumerate_in_order() {
        let scopes: Vec<Scope> = Scope::iter().collect();
        assert_eq!(
            scopes,
            vec![Scope::Connection, Scope::Publication, Scope::Subscription]
        );
    }

    #[test]
    fn scope_names() {
        assert_eq!(Scope::Subscription.to_string(), "subscription");
        assert_eq!(Scope::Publication.as_ref(), "publication");
    }
}
