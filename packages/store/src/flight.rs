//! Single-flight guards.
//!
//! A [`FlightSet`] holds the keys of operations currently in flight. Starting an
//! operation whose key is already present fails; the returned [`FlightGuard`]
//! frees the key when dropped, whichever way the operation ends.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Debug, Default)]
pub struct FlightSet {
    active: Arc<Mutex<HashSet<String>>>,
}

impl FlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // A poisoned set only means a guard panicked mid-drop; the keys are still valid.
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Key for `action` performed on behalf of `user_id`.
    pub fn key(action: &str, user_id: Option<&str>) -> String {
        format!("{action}:{}", user_id.unwrap_or("anonymous"))
    }

    /// Claims `key`, or returns `None` if it is already in flight.
    pub fn try_begin(&self, key: impl Into<String>) -> Option<FlightGuard> {
        let key = key.into();
        if !self.lock().insert(key.clone()) {
            return None;
        }
        Some(FlightGuard {
            set: self.clone(),
            key,
        })
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.lock().contains(key)
    }
}

#[derive(Debug)]
pub struct FlightGuard {
    set: FlightSet,
    key: String,
}

impl FlightGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_rejected_until_release() {
        let flights = FlightSet::new();
        let key = FlightSet::key("save_profile", Some("u1"));

        let guard = flights.try_begin(key.clone()).expect("first claim");
        assert!(flights.try_begin(key.clone()).is_none());
        assert!(flights.is_active(&key));

        drop(guard);
        assert!(!flights.is_active(&key));
        assert!(flights.try_begin(key).is_some());
    }

    #[test]
    fn test_keys_are_independent_per_action_and_user() {
        let flights = FlightSet::new();
        let _a = flights.try_begin(FlightSet::key("save_profile", Some("u1"))).unwrap();
        assert!(flights.try_begin(FlightSet::key("change_password", Some("u1"))).is_some());
        assert!(flights.try_begin(FlightSet::key("save_profile", Some("u2"))).is_some());
    }

    #[test]
    fn test_guard_released_on_panic() {
        let flights = FlightSet::new();
        let key = FlightSet::key("upload_avatar", Some("u1"));
        let cloned = flights.clone();
        let k = key.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = cloned.try_begin(k).unwrap();
            panic!("boom");
        });
        assert!(result.is_err());
        assert!(!flights.is_active(&key));
    }
}
