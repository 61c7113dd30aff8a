//! Stored Entry Module
//!
//! Defines the slot held by the in-process store, with optional expiration.

use std::time::Duration;

use tokio::time::Instant;

// == Slot ==
/// The data behind a key: a plain value or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// String-typed key
    Value(Vec<u8>),
    /// List-typed key, in push order
    List(Vec<Vec<u8>>),
}

// == Stored Entry ==
/// A single key's data and expiration deadline.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The stored data
    pub slot: Slot,
    /// Expiration deadline, None = no expiration
    pub expires_at: Option<Instant>,
}

impl StoredEntry {
    // == Constructor ==
    /// Creates a new entry expiring after `ttl`, or never when `ttl` is None.
    pub fn new(slot: Slot, ttl: Option<Duration>) -> Self {
        Self {
            slot,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its deadline, so a
    /// full TTL elapsed means immediately gone.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has a TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_no_ttl() {
        let entry = StoredEntry::new(Slot::Value(b"v".to_vec()), None);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining().is_none());

        tokio::time::advance(Duration::from_secs(3600)).await;
        assert!(!entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = StoredEntry::new(Slot::Value(b"v".to_vec()), Some(Duration::from_secs(10)));
        assert!(!entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Some(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(!entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Some(Duration::from_secs(6)));

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(entry.is_expired(), "Entry should be expired at the deadline");
        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }
}
