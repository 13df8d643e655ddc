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

//! Publish argument normalization.
//!
//! The client turns caller options into basic.publish method fields and basic
//! properties before anything is written to a channel. Logging the result of
//! the same rules keeps the logged properties identical to what was sent.

use amqp_log_error::AmqpLogResult;
use amqp_log_error::SerializationError;
use cheetah_string::CheetahString;
use serde::Serialize;
use serde_json::Value;

use crate::message::FieldTable;
use crate::message::MessageProperties;
use crate::message::PublishOptions;

/// Longest value an AMQP short string can carry.
pub const SHORT_STR_MAX_LEN: usize = 255;

pub const DELIVERY_MODE_TRANSIENT: u8 = 1;
pub const DELIVERY_MODE_PERSISTENT: u8 = 2;

/// Method fields of a basic.publish frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishFields {
    pub exchange: CheetahString,
    pub routing_key: CheetahString,
    pub mandatory: bool,
    pub immediate: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishArgs {
    pub fields: PublishFields,
    pub properties: MessageProperties,
}

/// Applies the client's publish argument rules to `options`.
///
/// * `persistent` wins over `delivery_mode` and maps to 2 (persistent) or 1.
/// * `expiration` is carried as a decimal string.
/// * `CC` and `BCC` are merged into the effective header table.
/// * `immediate` is always false, brokers no longer implement it.
pub fn normalize_publish(
    exchange: &str,
    routing_key: &str,
    options: &PublishOptions,
) -> AmqpLogResult<PublishArgs> {
    check_short_str("exchange", Some(exchange))?;
    check_short_str("routingKey", Some(routing_key))?;

    let mut headers = options.headers.clone().unwrap_or_default();
    merge_routing_header(&mut headers, "CC", &options.cc);
    merge_routing_header(&mut headers, "BCC", &options.bcc);

    let delivery_mode = match (options.persistent, options.delivery_mode) {
        (Some(true), _) => Some(DELIVERY_MODE_PERSISTENT),
        (Some(false), _) => Some(DELIVERY_MODE_TRANSIENT),
        (None, mode) => mode,
    };

    let properties = MessageProperties {
        content_type: options.content_type.clone(),
        content_encoding: options.content_encoding.clone(),
        headers,
        delivery_mode,
        priority: options.priority,
        correlation_id: options.correlation_id.clone(),
        reply_to: options.reply_to.clone(),
        expiration: options.expiration.map(|ttl| ttl.to_string()),
        message_id: options.message_id.clone(),
        timestamp: options.timestamp,
        message_type: options.message_type.clone(),
        user_id: options.user_id.clone(),
        app_id: options.app_id.clone(),
        cluster_id: None,
    };
    check_properties(&properties)?;

    Ok(PublishArgs {
        fields: PublishFields {
            exchange: CheetahString::from(exchange),
            routing_key: CheetahString::from(routing_key),
            mandatory: options.mandatory.unwrap_or(false),
            immediate: false,
        },
        properties,
    })
}

fn merge_routing_header(headers: &mut FieldTable, key: &str, routes: &[String]) {
    if routes.is_empty() {
        return;
    }
    let routes = routes.iter().cloned().map(Value::String).collect();
    headers.insert(key.to_string(), Value::Array(routes));
}

fn check_properties(properties: &MessageProperties) -> AmqpLogResult<()> {
    check_short_str("contentType", properties.content_type.as_deref())?;
    check_short_str("contentEncoding", properties.content_encoding.as_deref())?;
    check_short_str("correlationId", properties.correlation_id.as_deref())?;
    check_short_str("replyTo", properties.reply_to.as_deref())?;
    check_short_str("expiration", properties.expiration.as_deref())?;
    check_short_str("messageId", properties.message_id.as_deref())?;
    check_short_str("type", properties.message_type.as_deref())?;
    check_short_str("userId", properties.user_id.as_deref())?;
    check_short_str("appId", properties.app_id.as_deref())?;
    Ok(())
}

fn check_short_str(field: &'static str, value: Option<&str>) -> AmqpLogResult<()> {
    match value {
        Some(value) if value.len() > SHORT_STR_MAX_LEN => Err(SerializationError::invalid_value(
            field,
            format!("{} bytes exceeds short string limit {}", value.len(), SHORT_STR_MAX_LEN),
        )
        .into()),
        _ => Ok(()),
    }
}
