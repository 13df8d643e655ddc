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

//! Publish capture through the connection's send path.
//!
//! Used when the host does not offer a publish scope. The hook is registered
//! when the connection opens and the returned [`SendHookRegistration`] is held
//! by the plugin until it is destroyed.

use std::fmt;
use std::sync::Arc;

use amqp_log_error::AmqpLogResult;
use tracing::debug;
use tracing::warn;

use crate::hook::send_hook_registry::HookId;
use crate::hook::send_hook_registry::SendHookRegistry;
use crate::hook::send_message_context::SendMessageContext;
use crate::hook::send_message_hook::SendMessageHook;
use crate::interceptor::Recorder;

pub const LOGGING_SEND_HOOK_NAME: &str = "amqpLogSendMessage";

pub(crate) struct LoggingSendHook {
    recorder: Arc<Recorder>,
}

impl LoggingSendHook {
    pub(crate) fn new(recorder: Arc<Recorder>) -> Self {
        Self { recorder }
    }
}

impl SendMessageHook for LoggingSendHook {
    fn hook_name(&self) -> &str {
        LOGGING_SEND_HOOK_NAME
    }

    fn send_message_before(&self, context: &SendMessageContext<'_>) {
        let built = self
            .recorder
            .published(context.fields, context.properties.clone(), context.content, None);
        self.recorder.log_event(built);
    }
}

/// A hook registered on a connection, unregistered on release or drop.
pub struct SendHookRegistration {
    registry: Option<Arc<dyn SendHookRegistry>>,
    id: HookId,
}

impl SendHookRegistration {
    pub fn register(registry: Arc<dyn SendHookRegistry>, hook: Arc<dyn SendMessageHook>) -> Self {
        let id = registry.register_send_hook(hook);
        debug!(hook_id = %id, "send hook registered");
        Self {
            registry: Some(registry),
            id,
        }
    }

    pub fn id(&self) -> HookId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.registry.is_some()
    }

    /// Unregisters the hook. Releasing twice is a no-op.
    pub fn release(&mut self) -> AmqpLogResult<()> {
        match self.registry.take() {
            Some(registry) => {
                registry.unregister_send_hook(self.id)?;
                debug!(hook_id = %self.id, "send hook unregistered");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for SendHookRegistration {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(hook_id = %self.id, error = %e, "failed to unregister send hook");
        }
    }
}

impl fmt::Debug for SendHookRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendHookRegistration")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
