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

//! Size bounded content preview.

use std::borrow::Cow;

use amqp_log_error::AmqpLogResult;
use amqp_log_error::SerializationError;
use serde_json::Value;

use crate::config::BodyConfig;
use crate::message::Content;

/// Renders `content` for a log record.
///
/// Returns `Ok(None)` when previews are disabled or the encoded payload is
/// larger than `body.max_bytes`. Otherwise the bytes are parsed as JSON, and
/// failing that decoded as UTF-8 text. Bytes that are neither yield a
/// serialization error.
pub fn preview_content(content: &Content, body: &BodyConfig) -> AmqpLogResult<Option<Value>> {
    if !body.enabled {
        return Ok(None);
    }
    let bytes = encode(content)?;
    if bytes.len() > body.max_bytes {
        return Ok(None);
    }
    if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
        return Ok(Some(value));
    }
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| SerializationError::decode_failed("UTF-8", e.to_string()))?;
    Ok(Some(Value::String(text.to_string())))
}

fn encode(content: &Content) -> AmqpLogResult<Cow<'_, [u8]>> {
    let bytes = match content {
        Content::Bytes(bytes) => Cow::Borrowed(bytes.as_ref()),
        Content::Json(value) => Cow::Owned(
            serde_json::to_vec(value).map_err(|e| SerializationError::encode_failed("JSON", e.to_string()))?,
        ),
        Content::Text(text) => Cow::Owned(
            serde_json::to_vec(text).map_err(|e| SerializationError::encode_failed("JSON", e.to_string()))?,
        ),
    };
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    fn enabled() -> BodyConfig {
        BodyConfig::enabled(1000)
    }

    #[test]
    fn disabled_by_default() {
        let content = Content::from(json!({"string": "string"}));
        assert_eq!(preview_content(&content, &BodyConfig::default()).unwrap(), None);
    }

    #[test]
    fn structured_payload_round_trips() {
        let payload = json!({"string": "string", "nested": {"n": [1, 2, 3]}});
        let preview = preview_content(&Content::from(payload.clone()), &enabled()).unwrap();
        assert_eq!(preview, Some(payload));
    }

    #[test]
    fn binary_json_is_parsed() {
        let content = Content::Bytes(Bytes::from_static(br#"{"id":7}"#));
        assert_eq!(preview_content(&content, &enabled()).unwrap(), Some(json!({"id": 7})));
    }

    #[test]
    fn binary_text_falls_back_to_string() {
        let content = Content::Bytes(Bytes::from_static(b"plain text body"));
        assert_eq!(
            preview_content(&content, &enabled()).unwrap(),
            Some(json!("plain text body"))
        );
    }

    #[test]
    fn text_payload_is_json_encoded_first() {
        let content = Content::from("hello");
        assert_eq!(preview_content(&content, &enabled()).unwrap(), Some(json!("hello")));
    }

    #[test]
    fn oversized_payload_is_omitted() {
        let payload = json!({"data": "x".repeat(1000)});
        assert_eq!(preview_content(&Content::from(payload), &enabled()).unwrap(), None);
    }

    #[test]
    fn limit_is_inclusive() {
        let content = Content::Bytes(Bytes::from(vec![b'a'; 16]));
        let preview = preview_content(&content, &BodyConfig::enabled(16)).unwrap();
        assert_eq!(preview, Some(json!("a".repeat(16))));
        assert_eq!(preview_content(&content, &BodyConfig::enabled(15)).unwrap(), None);
    }

    #[test]
    fn undecodable_bytes_are_an_error() {
        let content = Content::Bytes(Bytes::from_static(&[0xff, 0xfe, 0x00, 0x9f]));
        let err = preview_content(&content, &enabled()).unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn undecodable_bytes_over_limit_are_omitted() {
        let content = Content::Bytes(Bytes::from_static(&[0xff, 0xfe, 0x00, 0x9f]));
        assert_eq!(preview_content(&content, &BodyConfig::enabled(2)).unwrap(), None);
    }
}
