//! Event dispatch.
//!
//! Decoded messages are routed to application callbacks by event key: a verb
//! (`PRIVMSG`), a known numeric reply (MOTD framing), or the synthetic
//! disconnect notification. Dispatch is synchronous, in registration order,
//! from the read loop's task. Each callback invocation is isolated — a
//! callback that returns an error or panics is logged and the remaining
//! callbacks still run, so a misbehaving subscriber can never stall the
//! protocol loop.

use crate::message::Message;
use crate::reply::ReplyCode;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// What a subscription is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// An alphabetic command, matched case-sensitively as received.
    Verb(String),
    /// A classified numeric reply.
    Reply(ReplyCode),
    /// The read loop ended: peer close, I/O error, or explicit disconnect.
    Disconnected,
}

/// Payload handed to subscribers.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A decoded inbound line, with its numeric classification when the
    /// command was a known reply code.
    Message {
        message: Message,
        reply: Option<ReplyCode>,
    },
    /// The connection ended.
    Disconnected { reason: String },
}

/// A subscriber callback. Fallible so applications can use `?` inside;
/// returned errors are logged by the dispatcher, never propagated.
pub type Handler = Box<dyn FnMut(&ClientEvent) -> anyhow::Result<()> + Send>;

/// Per-event subscriber lists. Insertion order is dispatch order; the same
/// callback may be registered more than once.
#[derive(Default)]
pub struct EventRegistry {
    handlers: HashMap<EventKey, Vec<Handler>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for an event key.
    pub fn subscribe<F>(&mut self, key: EventKey, handler: F)
    where
        F: FnMut(&ClientEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.handlers.entry(key).or_default().push(Box::new(handler));
    }

    /// Invoke every subscriber for `key`, in registration order. Errors and
    /// panics abort only the offending callback.
    pub fn dispatch(&mut self, key: &EventKey, event: &ClientEvent) {
        let Some(handlers) = self.handlers.get_mut(key) else {
            return;
        };
        for handler in handlers.iter_mut() {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(?key, "subscriber returned error: {e:#}"),
                Err(_) => warn!(?key, "subscriber panicked"),
            }
        }
    }

    /// Number of subscribers currently registered for `key`.
    pub fn subscriber_count(&self, key: &EventKey) -> usize {
        self.handlers.get(key).map_or(0, Vec::len)
    }
}
