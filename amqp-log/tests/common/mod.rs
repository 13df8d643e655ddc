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

//! In-memory stand-ins for the host client used by the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use amqp_log::args::normalize_publish;
use amqp_log::config::LogOptionsBuilder;
use amqp_log::hook::send_hook_registry::SendHookList;
use amqp_log::hook::send_hook_registry::SendHookRegistry;
use amqp_log::hook::send_message_context::SendMessageContext;
use amqp_log::host::ConsumeOk;
use amqp_log::host::MessageHandler;
use amqp_log::host::PublishCallback;
use amqp_log::message::ConsumeOptions;
use amqp_log::message::DeliveryFields;
use amqp_log::message::MessageProperties;
use amqp_log::message::PublishOptions;
use amqp_log::message::ServerProperties;
use amqp_log::ConnectTarget;
use amqp_log::ConnectionInfo;
use amqp_log::Connector;
use amqp_log::Consumer;
use amqp_log::Content;
use amqp_log::LogLevel;
use amqp_log::LogOptions;
use amqp_log::LogRecord;
use amqp_log::Message;
use amqp_log::Publisher;
use amqp_log::SocketOptions;
use amqp_log_error::AmqpLogError;
use amqp_log_error::AmqpLogResult;
use cheetah_string::CheetahString;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct Entry {
    pub level: LogLevel,
    pub record: LogRecord,
    pub message: String,
}

pub type Seen = Arc<Mutex<Vec<Entry>>>;

/// Options whose `log` function appends every record to the returned list.
pub fn recording_options(builder: LogOptionsBuilder) -> (LogOptions, Seen) {
    let seen: Seen = Arc::default();
    let sink = seen.clone();
    let options = builder
        .log(move |level, record, message| {
            sink.lock().push(Entry {
                level,
                record: record.clone(),
                message: message.to_string(),
            })
        })
        .build();
    (options, seen)
}

pub fn entries(seen: &Seen) -> Vec<Entry> {
    seen.lock().clone()
}

#[derive(Debug)]
pub struct FakeConnection {
    pub local: SocketAddr,
    pub peer: SocketAddr,
    pub server: ServerProperties,
    pub hooks: Option<Arc<SendHookList>>,
}

impl FakeConnection {
    pub fn new(hooks: Option<Arc<SendHookList>>) -> Self {
        Self {
            local: "127.0.0.1:53211".parse().unwrap(),
            peer: "127.0.0.1:5672".parse().unwrap(),
            server: ServerProperties::new("RabbitMQ", "3.13.7"),
            hooks,
        }
    }
}

impl ConnectionInfo for FakeConnection {
    fn local_addr(&self) -> Option<SocketAddr> {
        Some(self.local)
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        Some(self.peer)
    }

    fn server_properties(&self) -> &ServerProperties {
        &self.server
    }

    fn send_hooks(&self) -> Option<Arc<dyn SendHookRegistry>> {
        self.hooks
            .clone()
            .map(|hooks| hooks as Arc<dyn SendHookRegistry>)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub exchange: String,
    pub routing_key: String,
    pub content: Content,
    pub options: PublishOptions,
}

#[derive(Default)]
struct ClientState {
    published: Mutex<Vec<Published>>,
    handlers: Mutex<Vec<(String, MessageHandler)>>,
    connects: Mutex<Vec<ConnectTarget>>,
    confirm_error: Mutex<Option<String>>,
    spawn_confirms: bool,
    pending: Mutex<Vec<JoinHandle<()>>>,
    hooks: Arc<SendHookList>,
}

/// A client that keeps everything in memory.
///
/// Publishes run the registered send hooks, as a client's frame writer would,
/// and deliveries are pushed through [`FakeClient::deliver`].
#[derive(Clone, Default)]
pub struct FakeClient {
    state: Arc<ClientState>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirmations are reported from a spawned tokio task.
    pub fn with_spawned_confirms() -> Self {
        Self {
            state: Arc::new(ClientState {
                spawn_confirms: true,
                ..Default::default()
            }),
        }
    }

    pub fn fail_confirms_with(&self, message: &str) {
        *self.state.confirm_error.lock() = Some(message.to_string());
    }

    pub fn hooks(&self) -> Arc<SendHookList> {
        self.state.hooks.clone()
    }

    pub fn published(&self) -> Vec<Published> {
        self.state.published.lock().clone()
    }

    pub fn connects(&self) -> Vec<ConnectTarget> {
        self.state.connects.lock().clone()
    }

    /// Waits for every spawned confirmation.
    pub async fn flush(&self) {
        let pending: Vec<JoinHandle<()>> = self.state.pending.lock().drain(..).collect();
        for handle in pending {
            handle.await.unwrap();
        }
    }

    /// Delivers `message` to every handler consuming from `queue`.
    pub fn deliver(&self, queue: &str, message: Message) -> usize {
        let handlers: Vec<MessageHandler> = self
            .state
            .handlers
            .lock()
            .iter()
            .filter(|(q, _)| q == queue)
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in &handlers {
            handler(message.clone());
        }
        handlers.len()
    }

    fn write_frames(&self, exchange: &str, routing_key: &str, content: &Content, options: &PublishOptions) {
        self.state.published.lock().push(Published {
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
            content: content.clone(),
            options: options.clone(),
        });
        if let Ok(args) = normalize_publish(exchange, routing_key, options) {
            self.state.hooks.send_message_before(&SendMessageContext {
                channel: 1,
                fields: &args.fields,
                properties: &args.properties,
                content,
            });
        }
    }
}

impl Connector for FakeClient {
    type Connection = FakeConnection;

    fn connect(&self, target: &ConnectTarget, _socket_options: &SocketOptions) -> AmqpLogResult<FakeConnection> {
        self.state.connects.lock().push(target.clone());
        Ok(FakeConnection::new(Some(self.state.hooks.clone())))
    }
}

impl Publisher for FakeClient {
    fn publish(&self, exchange: &str, routing_key: &str, content: &Content, options: &PublishOptions) -> bool {
        self.write_frames(exchange, routing_key, content, options);
        true
    }

    fn publish_with_callback(
        &self,
        exchange: &str,
        routing_key: &str,
        content: &Content,
        options: &PublishOptions,
        callback: PublishCallback,
    ) -> bool {
        self.write_frames(exchange, routing_key, content, options);
        let error = self
            .state
            .confirm_error
            .lock()
            .clone()
            .map(|message| AmqpLogError::transport("publish", message));
        if self.state.spawn_confirms {
            let handle = tokio::spawn(async move {
                tokio::task::yield_now().await;
                callback(error.as_ref());
            });
            self.state.pending.lock().push(handle);
        } else {
            callback(error.as_ref());
        }
        true
    }
}

impl Consumer for FakeClient {
    fn consume(&self, queue: &str, handler: MessageHandler, options: &ConsumeOptions) -> AmqpLogResult<ConsumeOk> {
        self.state.handlers.lock().push((queue.to_string(), handler));
        let tag = options
            .consumer_tag
            .clone()
            .unwrap_or_else(|| format!("amq.ctag-{queue}"));
        Ok(ConsumeOk {
            consumer_tag: CheetahString::from_string(tag),
        })
    }
}

pub fn delivery(exchange: &str, routing_key: &str, content: Content) -> Message {
    Message {
        fields: DeliveryFields {
            consumer_tag: CheetahString::from_static_str("amq.ctag-foo"),
            delivery_tag: 1,
            redelivered: false,
            exchange: CheetahString::from(exchange),
            routing_key: CheetahString::from(routing_key),
        },
        properties: MessageProperties {
            content_type: Some("application/json".to_string()),
            ..Default::default()
        },
        content,
    }
}
