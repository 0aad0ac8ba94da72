//! Handler registry
//!
//! Maps event names to handler functions. The registry is replaced in full
//! via [`Consumer::set_handlers`](crate::Consumer::set_handlers); there is
//! no partial-update contract.

use crate::error::BoxError;
use std::collections::HashMap;
use std::fmt;

/// Handler invoked with the full raw payload of a decoded event
pub type EventHandler = Box<dyn Fn(&[u8]) -> Result<(), BoxError> + Send + Sync>;

/// Mapping from event name to handler function
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, EventHandler>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: register a handler for an event name
    pub fn with_handler(mut self, name: impl Into<String>, handler: EventHandler) -> Self {
        self.insert(name, handler);
        self
    }

    /// Register a handler, replacing any previous one for the same name
    pub fn insert(&mut self, name: impl Into<String>, handler: EventHandler) {
        self.handlers.insert(name.into(), handler);
    }

    /// Look up a handler by exact event name
    pub fn get(&self, name: &str) -> Option<&EventHandler> {
        self.handlers.get(name)
    }

    /// Check whether a handler is registered for the given name
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Get the number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
