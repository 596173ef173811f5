//! String keyed index used for all term and gene lookups
//!
//! [`IndexedMap`] keeps the contract of a classic chained hash table with
//! a fixed number of buckets: inserting an existing key replaces its value
//! and hands back the previous one. It is backed by the standard
//! [`HashMap`] using a polynomial rolling hash ([`RollingHasher`]).
use std::collections::hash_map::{Iter, Keys};
use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hasher};

const HASH_MULTIPLIER: u64 = 131;

/// Polynomial rolling hash over the key bytes
///
/// `h = h * 131 + byte` for every byte, wrapping on overflow.
#[derive(Debug, Default, Clone, Copy)]
pub struct RollingHasher {
    state: u64,
}

impl Hasher for RollingHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state = self
                .state
                .wrapping_mul(HASH_MULTIPLIER)
                .wrapping_add(u64::from(*byte));
        }
    }
}

/// [`std::hash::BuildHasher`] for [`RollingHasher`]
pub type BuildRollingHasher = BuildHasherDefault<RollingHasher>;

/// A map from `String` keys to values
///
/// # Examples
///
/// ```
/// use goterm::index::IndexedMap;
///
/// let mut map = IndexedMap::with_capacity(4);
/// assert!(map.put("GO:0008150", 1).is_none());
/// assert_eq!(map.put("GO:0008150", 2), Some(1));
///
/// assert_eq!(map.get("GO:0008150"), Some(&2));
/// assert!(!map.contains("GO:0003674"));
/// ```
#[derive(Debug, Clone)]
pub struct IndexedMap<V> {
    inner: HashMap<String, V, BuildRollingHasher>,
}

impl<V> Default for IndexedMap<V> {
    fn default() -> Self {
        Self::with_capacity(1)
    }
}

impl<V> IndexedMap<V> {
    /// Constructs a new, empty map that holds at least `capacity` entries
    /// without reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: HashMap::with_capacity_and_hasher(capacity.max(1), BuildRollingHasher::default()),
        }
    }

    /// Inserts `value` under `key`
    ///
    /// If the key is already present, its value is replaced and the old
    /// value is returned.
    pub fn put<K: Into<String>>(&mut self, key: K, value: V) -> Option<V> {
        self.inner.insert(key.into(), value)
    }

    /// Returns a reference to the value of `key`
    pub fn get(&self, key: &str) -> Option<&V> {
        self.inner.get(key)
    }

    /// Returns a mutable reference to the value of `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.inner.get_mut(key)
    }

    /// Returns `true` if the map contains `key`
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the map is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates all keys in arbitrary order
    pub fn keys(&self) -> Keys<'_, String, V> {
        self.inner.keys()
    }

    /// Iterates all entries in arbitrary order
    pub fn iter(&self) -> Iter<'_, String, V> {
        self.inner.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::hash::Hash;

    fn hash(key: &str) -> u64 {
        let mut hasher = RollingHasher::default();
        hasher.write(key.as_bytes());
        hasher.finish()
    }

    #[test]
    fn rolling_hash() {
        assert_eq!(hash(""), 0);
        assert_eq!(hash("a"), 97);
        assert_eq!(hash("ab"), 97 * 131 + 98);
    }

    #[test]
    fn equal_keys_hash_equal() {
        let mut h1 = RollingHasher::default();
        let mut h2 = RollingHasher::default();
        "GO:0005575".hash(&mut h1);
        String::from("GO:0005575").hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn replace_beyond_first_entry() {
        let mut map = IndexedMap::with_capacity(1);
        for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
            assert!(map.put(*key, i).is_none());
        }
        assert_eq!(map.put("c", 10), Some(2));
        assert_eq!(map.put("a", 20), Some(0));
        assert_eq!(map.len(), 4);
        assert_eq!(map.get("c"), Some(&10));
        assert_eq!(map.get("a"), Some(&20));
        assert_eq!(map.get("d"), Some(&3));
    }

    #[test]
    fn missing_keys() {
        let map: IndexedMap<u8> = IndexedMap::default();
        assert!(map.is_empty());
        assert!(map.get("foo").is_none());
        assert!(!map.contains("foo"));
    }
}
