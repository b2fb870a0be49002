//! Toast notifications: short success/error messages shown after an action.
//! Kept in a bounded in-memory history; no delivery channels.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Ring buffer of the most recent toasts.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    history: VecDeque<Toast>,
    capacity: usize,
}

impl ToastQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            ToastKind::Error => tracing::error!(%message, "toast"),
            ToastKind::Success => tracing::info!(%message, "toast"),
        }
        self.history.push_back(Toast {
            kind,
            message,
            created_at: Utc::now(),
        });
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.history.back()
    }

    pub fn history(&self) -> impl Iterator<Item = &Toast> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Take every toast, oldest first, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Toast> {
        self.history.drain(..).collect()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_keeps_latest() {
        let mut q = ToastQueue::new(3);
        for i in 0..5 {
            q.success(format!("msg {i}"));
        }
        let messages: Vec<_> = q.history().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn test_latest_and_drain() {
        let mut q = ToastQueue::default();
        q.success("Saved");
        q.error("Failed");
        assert_eq!(q.latest().unwrap().kind, ToastKind::Error);
        let drained = q.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "Saved");
        assert!(q.is_empty());
    }
}
