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

use crate::args::PublishFields;
use crate::message::Content;
use crate::message::MessageProperties;

/// Arguments of one basic.publish frame send, as the client writes them.
#[derive(Debug, Clone, Copy)]
pub struct SendMessageContext<'a> {
    pub channel: u16,
    pub fields: &'a PublishFields,
    pub properties: &'a MessageProperties,
    pub content: &'a Content,
}
