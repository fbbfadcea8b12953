//! Recipient - Cheap-to-clone recipient identifier and the immutable batch queue
//!
//! Uses Arc<str> / Arc<[T]> internally for O(1) clone operations.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Recipient identifier (an e-mail address) with cheap cloning.
///
/// Recipients are created once when the queue is built and then cloned into
/// every request, outcome and status entry that mentions them.
///
/// # Examples
/// ```
/// use contracts::Recipient;
///
/// let r: Recipient = "a@x.com".into();
/// let r2 = r.clone();
/// assert_eq!(r, r2);
/// assert_eq!(r.as_str(), "a@x.com");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Recipient(Arc<str>);

impl Recipient {
    /// Create a new Recipient from a string slice.
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Recipient {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Recipient {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Recipient {
    #[inline]
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for Recipient {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Recipient({:?})", self.0)
    }
}

impl PartialEq<str> for Recipient {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for Recipient {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for Recipient {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Recipient {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

/// Ordered recipient queue of one batch.
///
/// The backing slice is shared and never mutated: once a batch starts, the
/// controller only reads it by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientQueue(Arc<[Recipient]>);

impl RecipientQueue {
    /// Number of recipients
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the queue holds no recipients
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recipient at position `index`
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Recipient> {
        self.0.get(index)
    }

    /// Iterate recipients in queue order
    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.0.iter()
    }

    /// Borrow the recipients as a slice
    pub fn as_slice(&self) -> &[Recipient] {
        &self.0
    }
}

impl<R: Into<Recipient>> FromIterator<R> for RecipientQueue {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<Recipient>> for RecipientQueue {
    fn from(recipients: Vec<Recipient>) -> Self {
        Self(recipients.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_clone_shares_storage() {
        let r = Recipient::new("a@x.com");
        let r2 = r.clone();
        assert!(Arc::ptr_eq(&r.0, &r2.0));
        assert_eq!(r2, "a@x.com");
    }

    #[test]
    fn test_queue_preserves_order_and_duplicates() {
        let queue: RecipientQueue = ["b@x.com", "a@x.com", "b@x.com"].into_iter().collect();
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.get(0).map(Recipient::as_str), Some("b@x.com"));
        assert_eq!(queue.get(2).map(Recipient::as_str), Some("b@x.com"));
        assert!(queue.get(3).is_none());
    }

    #[test]
    fn test_recipient_serde_as_plain_string() {
        let r = Recipient::new("a@x.com");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"a@x.com\"");
        let back: Recipient = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
