//! Progress sink
//!
//! Human-readable build progress is a side channel: it must never affect
//! scheduling decisions, and the silent implementation is safe to use
//! anywhere.

use std::sync::{Arc, Mutex};

/// Receiver for human-readable progress messages
pub trait Progress: Send + Sync {
    fn emit(&self, message: &str);
}

/// Progress sink that prints to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn emit(&self, message: &str) {
        println!("{}", message);
    }
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn emit(&self, _message: &str) {}
}

/// Progress sink that buffers messages for later inspection
#[derive(Debug, Clone, Default)]
pub struct BufferProgress {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BufferProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message emitted so far
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl Progress for BufferProgress {
    fn emit(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
