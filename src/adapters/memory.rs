//! In-memory ledger adapter.
//!
//! Implements [`LedgerPort`] over a plain `HashMap`. Used by tests and by
//! hosts that want the core without a durable store; a production deployment
//! supplies its own adapter over the real ledger.

use std::collections::HashMap;

use crate::app::ports::{LedgerError, LedgerPort};

/// HashMap-backed [`LedgerPort`].
#[derive(Debug, Default)]
pub struct MemoryLedger {
    store: HashMap<String, Vec<u8>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerPort for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.store.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.store.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), LedgerError> {
        self.store.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut ledger = MemoryLedger::new();
        ledger.put("k", b"value").unwrap();
        assert!(ledger.exists("k"));
        assert_eq!(ledger.get("k").unwrap().as_deref(), Some(&b"value"[..]));

        ledger.delete("k").unwrap();
        assert!(!ledger.exists("k"));
        assert_eq!(ledger.get("k").unwrap(), None);
    }

    #[test]
    fn delete_missing_key_is_ok() {
        let mut ledger = MemoryLedger::new();
        assert!(ledger.delete("nope").is_ok());
    }

    #[test]
    fn keys_are_independent() {
        let mut ledger = MemoryLedger::new();
        ledger.put("a", b"alpha").unwrap();
        ledger.put("b", b"bravo").unwrap();
        assert_eq!(ledger.get("a").unwrap().as_deref(), Some(&b"alpha"[..]));
        assert_eq!(ledger.get("b").unwrap().as_deref(), Some(&b"bravo"[..]));
    }
}
