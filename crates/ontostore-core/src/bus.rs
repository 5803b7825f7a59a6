//! The event-bus contract consumed by the change-notification layer, and
//! [`MemoryBus`], an in-process implementation of it.
//!
//! A production bus lives outside this workspace; anything implementing
//! [`EventBus`] can be wired into the service.

use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;

use crate::event::topic_matches;

/// Errors raised by a bus implementation.
pub type BusError = Box<dyn std::error::Error + Send + Sync>;

/// A subscriber callback. Receives the raw published payload.
pub type Callback = Arc<dyn Fn(Bytes) + Send + Sync>;

pub trait EventBus: Send + Sync {
  /// Publish `payload` on `topic` within `domain`.
  fn publish(&self, domain: &str, topic: &str, payload: Bytes) -> Result<(), BusError>;

  /// Register `callback` for every topic in `domain` matched by
  /// `topic_pattern`.
  fn consume(
    &self,
    domain: &str,
    topic_pattern: &str,
    callback: Callback,
  ) -> Result<(), BusError>;
}

// ─── In-process bus ──────────────────────────────────────────────────────────

struct Subscription {
  domain:   String,
  pattern:  String,
  callback: Callback,
}

/// Synchronous, in-process bus. `publish` invokes every matching callback on
/// the calling thread before returning.
#[derive(Default, Clone)]
pub struct MemoryBus {
  subscriptions: Arc<Mutex<Vec<Subscription>>>,
}

impl MemoryBus {
  pub fn new() -> Self { Self::default() }
}

impl EventBus for MemoryBus {
  fn publish(&self, domain: &str, topic: &str, payload: Bytes) -> Result<(), BusError> {
    // Callbacks run outside the lock so they may subscribe or publish.
    let targets: Vec<Callback> = self
      .subscriptions
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .iter()
      .filter(|s| s.domain == domain && topic_matches(&s.pattern, topic))
      .map(|s| Arc::clone(&s.callback))
      .collect();

    for callback in targets {
      callback(payload.clone());
    }
    Ok(())
  }

  fn consume(
    &self,
    domain: &str,
    topic_pattern: &str,
    callback: Callback,
  ) -> Result<(), BusError> {
    self
      .subscriptions
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(Subscription {
        domain: domain.to_owned(),
        pattern: topic_pattern.to_owned(),
        callback,
      });
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn collector() -> (Arc<Mutex<Vec<Bytes>>>, Callback) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: Callback = Arc::new(move |b| sink.lock().unwrap().push(b));
    (seen, callback)
  }

  #[test]
  fn delivers_to_matching_patterns_only() {
    let bus = MemoryBus::new();
    let (hits, cb) = collector();
    bus.consume("d", "ts.insert.*", cb).unwrap();

    bus.publish("d", "ts.insert.x", Bytes::from_static(b"1")).unwrap();
    bus.publish("d", "ts.delete.x", Bytes::from_static(b"2")).unwrap();
    bus.publish("other", "ts.insert.x", Bytes::from_static(b"3")).unwrap();

    assert_eq!(*hits.lock().unwrap(), vec![Bytes::from_static(b"1")]);
  }

  #[test]
  fn fans_out_to_every_subscriber() {
    let bus = MemoryBus::new();
    let (a, cb_a) = collector();
    let (b, cb_b) = collector();
    bus.consume("d", "*.x", cb_a).unwrap();
    bus.consume("d", "y.*", cb_b).unwrap();

    bus.publish("d", "y.x", Bytes::from_static(b"p")).unwrap();

    assert_eq!(a.lock().unwrap().len(), 1);
    assert_eq!(b.lock().unwrap().len(), 1);
  }
}
