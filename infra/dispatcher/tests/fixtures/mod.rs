#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use tidings_dispatcher::event_map;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub id: u64,
    pub total: u32,
}

#[event_map]
pub enum Shop {
    /// A bare number, handy for ordering checks.
    Number(i64),
    OrderPlaced(Order),
    Refund(u64, u32),
    #[event(name = "shop:closed")]
    Closed,
}

#[event_map]
pub enum Audit {
    Entry(String),
}

/// Thread-safe record of listener calls.
#[derive(Debug)]
pub struct Log<T> {
    calls: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Log<T> {
    fn clone(&self) -> Self {
        Self { calls: Arc::clone(&self.calls) }
    }
}

impl<T: Clone> Log<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { calls: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn record(&self, value: T) {
        self.calls.lock().push(value);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<T> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }
}
