use std::fmt;

/// Caller-owned storage for at most one live key.
///
/// A slot is either absent or fully populated. Import and generate
/// operations build their result off to the side and only call
/// [`KeySlot::replace`] once it is complete, so a failure never
/// disturbs the current contents.
pub struct KeySlot<K> {
    key: Option<K>,
}

impl<K> KeySlot<K> {
    pub const fn empty() -> Self {
        Self { key: None }
    }

    pub fn with_key(key: K) -> Self {
        Self { key: Some(key) }
    }

    pub fn is_present(&self) -> bool {
        self.key.is_some()
    }

    pub fn get(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Install `key`, dropping (and thereby wiping) any previous key.
    pub(crate) fn replace(&mut self, key: K) {
        self.key = Some(key);
    }

    /// Make the slot absent. Always succeeds.
    pub fn free(&mut self) {
        self.key = None;
    }
}

impl<K> Default for KeySlot<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: Clone> Clone for KeySlot<K> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for KeySlot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "KeySlot({:?})", key),
            None => write!(f, "KeySlot(absent)"),
        }
    }
}
