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

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use amqp_log_error::AmqpLogError;
use amqp_log_error::AmqpLogResult;
use parking_lot::RwLock;

use crate::hook::send_message_context::SendMessageContext;
use crate::hook::send_message_hook::SendMessageHook;

/// Identifies one registration in a [`SendHookRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

impl HookId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "send-hook-{}", self.0)
    }
}

/// Registration point for hooks on a connection's send path.
pub trait SendHookRegistry: Send + Sync {
    fn register_send_hook(&self, hook: Arc<dyn SendMessageHook>) -> HookId;

    /// Fails with [`AmqpLogError::HookNotRegistered`] for unknown ids.
    fn unregister_send_hook(&self, id: HookId) -> AmqpLogResult<()>;
}

/// Ready made registry a client can embed and run from its send path.
#[derive(Default)]
pub struct SendHookList {
    next_id: AtomicU64,
    hooks: RwLock<Vec<(HookId, Arc<dyn SendMessageHook>)>>,
}

impl SendHookList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every registered hook, in registration order.
    pub fn send_message_before(&self, context: &SendMessageContext<'_>) {
        let hooks: Vec<Arc<dyn SendMessageHook>> = self.hooks.read().iter().map(|(_, hook)| hook.clone()).collect();
        for hook in hooks {
            hook.send_message_before(context);
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }

    pub fn hook_names(&self) -> Vec<String> {
        self.hooks
            .read()
            .iter()
            .map(|(_, hook)| hook.hook_name().to_string())
            .collect()
    }
}

impl SendHookRegistry for SendHookList {
    fn register_send_hook(&self, hook: Arc<dyn SendMessageHook>) -> HookId {
        let id = HookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.hooks.write().push((id, hook));
        id
    }

    fn unregister_send_hook(&self, id: HookId) -> AmqpLogResult<()> {
        let mut hooks = self.hooks.write();
        let before = hooks.len();
        hooks.retain(|(registered, _)| *registered != id);
        if hooks.len() == before {
            return Err(AmqpLogError::HookNotRegistered);
        }
        Ok(())
    }
}

impl fmt::Debug for SendHookList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendHookList")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::args::PublishFields;
    use crate::message::Content;
    use crate::message::MessageProperties;

    struct CountingHook(AtomicUsize);

    impl SendMessageHook for CountingHook {
        fn hook_name(&self) -> &str {
            "counting"
        }

        fn send_message_before(&self, _context: &SendMessageContext<'_>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn send(list: &SendHookList) {
        let fields = PublishFields::default();
        let properties = MessageProperties::default();
        let content = Content::from("x");
        list.send_message_before(&SendMessageContext {
            channel: 1,
            fields: &fields,
            properties: &properties,
            content: &content,
        });
    }

    #[test]
    fn register_run_unregister() {
        let list = SendHookList::new();
        let hook = Arc::new(CountingHook(AtomicUsize::new(0)));
        let id = list.register_send_hook(hook.clone());
        assert_eq!(list.hook_names(), vec!["counting".to_string()]);

        send(&list);
        send(&list);
        assert_eq!(hook.0.load(Ordering::SeqCst), 2);

        list.unregister_send_hook(id).unwrap();
        assert!(list.is_empty());
        send(&list);
        assert_eq!(hook.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unregister_twice_fails() {
        let list = SendHookList::new();
        let id = list.register_send_hook(Arc::new(CountingHook(AtomicUsize::new(0))));
        list.unregister_send_hook(id).unwrap();
        let err = list.unregister_send_hook(id).unwrap_err();
        assert!(matches!(err, AmqpLogError::HookNotRegistered));
    }

    #[test]
    fn ids_are_distinct() {
        let list = SendHookList::new();
        let a = list.register_send_hook(Arc::new(CountingHook(AtomicUsize::new(0))));
        let b = list.register_send_hook(Arc::new(CountingHook(AtomicUsize::new(0))));
        assert_ne!(a, b);
        assert_eq!(list.len(), 2);
        assert_eq!(a.to_string(), "send-hook-0");
    }
}
