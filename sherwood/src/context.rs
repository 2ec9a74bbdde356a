//! Hashing and equality strategies for table keys
//!
//! A table never hashes or compares keys on its own: both operations go
//! through a [`HashContext`] supplied at construction and stored inside
//! the table. That keeps key types decoupled from the layout machinery
//! and lets one key type be handled several ways; a `String` key can hash
//! structurally via [`AutoContext`] or as raw bytes via [`BytesContext`].
//!
//! The contract a context must honor is spelled out on the trait. None of
//! it is checked at runtime; a context that cannot supply both operations
//! for a key type simply does not implement the trait, and a table over
//! that pairing will not compile.

use crate::siphash::SipHasher13;
use std::hash::{Hash, Hasher};

/// First half of the fixed SipHash-1-3 key used by the built-in contexts
///
/// There is nothing special about this value; it only needs to be a
/// constant so that equal keys hash equal across runs and across tables.
const SIP_KEY_0: u64 = u64::from_le_bytes(*b"sherwood");
/// Second half of the fixed SipHash-1-3 key
const SIP_KEY_1: u64 = u64::from_le_bytes(*b"staticmp");

/// Hashing and equality capability for a key type
///
/// Every probe the table makes goes through one of these two operations.
/// An implementation must behave like a coherent hash map strategy:
///
/// - `hash` is pure: the same key always produces the same value for the
///   lifetime of the context.
/// - `eql` is an equivalence relation, and keys that compare equal must
///   hash equal.
///
/// A context may implement the trait for more than one key type. When it
/// does, and a table's lookups borrow the stored key type as a cheaper
/// query type (`String` stored, `str` queried), the context must hash and
/// compare both types consistently, the same requirement
/// [`std::collections::HashMap`] places on [`std::borrow::Borrow`] keys.
/// Both built-in contexts honor this for every pairing they accept.
pub trait HashContext<K: ?Sized> {
    /// Hash a key to a 64-bit value
    fn hash(&self, key: &K) -> u64;

    /// Decide whether two keys are the same key
    fn eql(&self, a: &K, b: &K) -> bool;
}

/// Context for any key type that is [`Hash`] and [`Eq`]
///
/// Keys are fed through a fixed-key [`SipHasher13`], so unlike tables
/// keyed by `RandomState` the same pair list produces the same layout on
/// every run. Hash values follow the key type's [`Hash`] impl and are
/// stable within a platform, but integer keys hash their native-endian
/// bytes; use [`BytesContext`] where values must not depend on the
/// platform.
///
/// This is the default context for [`crate::StaticMap::build`].
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct AutoContext;

impl<K: Hash + Eq + ?Sized> HashContext<K> for AutoContext {
    /// Hash via the key's own [`Hash`] impl over fixed-key SipHash-1-3
    fn hash(&self, key: &K) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(SIP_KEY_0, SIP_KEY_1);
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Compare via the key's own [`Eq`] impl
    fn eql(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Context for keys viewable as byte sequences
///
/// Accepts any key implementing `AsRef<[u8]>`: `str`, `String`, `[u8]`,
/// `Vec<u8>`, and references to them. Two keys are the same key exactly
/// when their byte sequences match, and the hash runs over those raw
/// bytes, so values are identical on every platform and across the
/// accepted key types.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct BytesContext;

impl<K: AsRef<[u8]> + ?Sized> HashContext<K> for BytesContext {
    /// Hash the raw bytes with fixed-key SipHash-1-3
    fn hash(&self, key: &K) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(SIP_KEY_0, SIP_KEY_1);
        hasher.write(key.as_ref());
        hasher.finish()
    }

    /// Compare byte sequences
    fn eql(&self, a: &K, b: &K) -> bool {
        a.as_ref() == b.as_ref()
    }
}
