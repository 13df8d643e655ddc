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

mod common;

use amqp_log::interceptor::send_hook::LOGGING_SEND_HOOK_NAME;
use amqp_log::message::PublishOptions;
use amqp_log::Command;
use amqp_log::ConnectTarget;
use amqp_log::Connector;
use amqp_log::Content;
use amqp_log::IntegrationStrategy;
use amqp_log::LogLevel;
use amqp_log::LogOptions;
use amqp_log::LogPlugin;
use amqp_log::MessageFormat;
use amqp_log::Plugin;
use amqp_log::Publisher;
use amqp_log::Scope;
use amqp_log::SocketOptions;
use common::entries;
use common::recording_options;
use common::FakeClient;
use common::FakeConnection;
use serde_json::json;

fn patch_based() -> amqp_log::config::LogOptionsBuilder {
    LogOptions::builder()
        .strategy(IntegrationStrategy::PatchBased)
        .message_format(MessageFormat::Plain)
}

#[test]
fn sends_are_logged_through_the_registry() {
    let (options, seen) = recording_options(patch_based().enable_body(1000));
    let mut plugin = LogPlugin::new(options);
    plugin.init().unwrap();
    assert!(!plugin.scopes().contains(&Scope::Publication));

    let client = FakeClient::new();
    let connection = plugin
        .wrap_connector(client.clone())
        .connect(&ConnectTarget::from("amqp://localhost"), &SocketOptions::default())
        .unwrap();
    plugin.on_open(&connection);
    assert!(plugin.has_send_hook());
    assert_eq!(client.hooks().hook_names(), vec![LOGGING_SEND_HOOK_NAME.to_string()]);

    // The publish primitive is used unwrapped; the send path reports it.
    client.publish(
        "amq.direct",
        "a.routing.key",
        &Content::from(json!({"string": "string"})),
        &PublishOptions::default().with_header("x-test", "true"),
    );

    let entries = entries(&seen);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].level, LogLevel::Debug);
    let entry = &entries[1];
    assert_eq!(entry.level, LogLevel::Info);
    assert_eq!(entry.message, "Message published.");
    assert_eq!(entry.record.command, Some(Command::Publish));
    let record = entry.record.to_value().unwrap();
    assert_eq!(record["exchange"], json!("amq.direct"));
    assert_eq!(record["routingKey"], json!("a.routing.key"));
    assert_eq!(record["content"], json!({"string": "string"}));
    assert_eq!(record["properties"]["headers"], json!({"x-test": "true"}));
    assert_eq!(record["protocol"], json!("amqp"));
    assert_eq!(record["properties"]["mandatory"], json!(false));
}

#[test]
fn send_path_logs_mandatory_flag() {
    let (options, seen) = recording_options(patch_based());
    let plugin = LogPlugin::new(options);
    let client = FakeClient::new();
    plugin.on_open(&FakeConnection::new(Some(client.hooks())));

    let publish_options = PublishOptions {
        mandatory: Some(true),
        ..Default::default()
    };
    client.publish("amq.direct", "k", &Content::from("x"), &publish_options);

    let entries = entries(&seen);
    let published = entries.iter().find(|e| e.level == LogLevel::Info).unwrap();
    let record = published.record.to_value().unwrap();
    assert_eq!(record["properties"]["mandatory"], json!(true));
}

#[test]
fn destroy_unregisters_the_hook() {
    let (options, seen) = recording_options(patch_based());
    let mut plugin = LogPlugin::new(options);
    plugin.init().unwrap();
    let client = FakeClient::new();
    plugin.on_open(&FakeConnection::new(Some(client.hooks())));
    assert_eq!(client.hooks().len(), 1);

    plugin.destroy();
    assert!(!plugin.has_send_hook());
    assert!(client.hooks().is_empty());

    client.publish("amq.direct", "k", &Content::from("x"), &PublishOptions::default());
    assert!(entries(&seen).iter().all(|e| e.level == LogLevel::Debug));
}

#[test]
fn reopen_replaces_previous_registration() {
    let (options, _seen) = recording_options(patch_based());
    let plugin = LogPlugin::new(options);
    let client = FakeClient::new();
    plugin.on_open(&FakeConnection::new(Some(client.hooks())));
    plugin.on_open(&FakeConnection::new(Some(client.hooks())));
    assert_eq!(client.hooks().len(), 1);
}

#[test]
fn dropping_the_plugin_releases_the_hook() {
    let client = FakeClient::new();
    {
        let (options, _seen) = recording_options(patch_based());
        let plugin = LogPlugin::new(options);
        plugin.on_open(&FakeConnection::new(Some(client.hooks())));
        assert_eq!(client.hooks().len(), 1);
    }
    assert!(client.hooks().is_empty());
}

#[test]
fn connection_without_registry_logs_nothing_on_send() {
    let (options, seen) = recording_options(patch_based());
    let plugin = LogPlugin::new(options);
    plugin.on_open(&FakeConnection::new(None));
    assert!(!plugin.has_send_hook());
    assert_eq!(entries(&seen).len(), 1);
}

#[test]
fn hook_based_does_not_register() {
    let (options, seen) = recording_options(LogOptions::builder());
    let plugin = LogPlugin::new(options);
    let client = FakeClient::new();
    plugin.on_open(&FakeConnection::new(Some(client.hooks())));
    assert!(client.hooks().is_empty());

    let publisher = plugin.wrap_publisher(client.clone());
    publisher.publish("amq.direct", "k", &Content::from("x"), &PublishOptions::default());
    let infos = entries(&seen).into_iter().filter(|e| e.level == LogLevel::Info).count();
    assert_eq!(infos, 1);
}
