//! Configuration sources
//!
//! Everything in [`crate::config`] reads its values through [`EnvSource`]
//! rather than touching the process environment directly. The binary passes
//! [`ProcessEnv`]; tests pass a plain `HashMap`.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Key/value lookup that configuration is resolved from
pub trait EnvSource {
    /// Raw value for `key`, if present
    fn get(&self, key: &str) -> Option<String>;

    /// Value for `key`, treating an empty (or whitespace-only) value as unset
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<K, V> EnvSource for HashMap<K, V>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
{
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|v| v.as_ref().to_string())
    }
}

impl<K, V> EnvSource for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).map(|v| v.as_ref().to_string())
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}
