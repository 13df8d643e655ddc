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

use crate::hook::send_message_context::SendMessageContext;

/// Hook run by the client on its low-level message send path.
pub trait SendMessageHook: Send + Sync + 'static {
    /// Returns the name of the hook.
    ///
    /// This is typically used for logging and debugging purposes.
    fn hook_name(&self) -> &str;

    /// Called before the frames of a message are written to the socket.
    ///
    /// Implementations must not block; they run on the client's send path.
    fn send_message_before(&self, context: &SendMessageContext<'_>);
}
