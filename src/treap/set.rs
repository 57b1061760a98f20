use crate::treap::comparator::MaxPriority;
use crate::treap::tree::Treap;
use rand::{Rng, SeedableRng, XorShiftRng};

/// An ordered set implemented by a treap with randomly generated priorities.
///
/// Every inserted key gets an independent priority drawn from the set's own generator, so the
/// expected height of the underlying treap is logarithmic in the number of keys regardless of
/// insertion order.
///
/// # Examples
/// ```
/// use treap_index::treap::TreapSet;
///
/// let mut set = TreapSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.max(), Some(&3));
///
/// assert!(set.remove(&0));
/// assert!(!set.remove(&1));
/// ```
pub struct TreapSet<K> {
    treap: Treap<K, u32, MaxPriority>,
    rng: XorShiftRng,
}

impl<K> TreapSet<K>
where
    K: Ord,
{
    /// Constructs a new, empty `TreapSet<K>` with an unseeded generator. Two sets built this way
    /// and fed the same operations have the same shape.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::TreapSet;
    ///
    /// let set: TreapSet<u32> = TreapSet::new();
    /// ```
    pub fn new() -> Self {
        TreapSet {
            treap: Treap::new(),
            rng: XorShiftRng::new_unseeded(),
        }
    }

    /// Constructs a new, empty `TreapSet<K>` whose priorities are drawn from a generator seeded
    /// with `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `seed` is all zeros.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::TreapSet;
    ///
    /// let mut set = TreapSet::from_seed([1, 2, 3, 4]);
    /// set.insert("a");
    /// assert!(set.contains(&"a"));
    /// ```
    pub fn from_seed(seed: [u32; 4]) -> Self {
        TreapSet {
            treap: Treap::new(),
            rng: XorShiftRng::from_seed(seed),
        }
    }

    /// Inserts a key into the set. Returns `false` if the key was already present, in which case
    /// the set is unchanged.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        if self.treap.contains(&key) {
            return false;
        }
        let priority = self.rng.next_u32();
        self.treap.insert(key, priority);
        true
    }

    /// Removes a key from the set. Returns `false` if the key was not present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.treap.remove(key)
    }

    /// Checks if a key exists in the set.
    pub fn contains(&self, key: &K) -> bool {
        self.treap.contains(key)
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.treap.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.treap.is_empty()
    }

    /// Removes every key from the set.
    pub fn clear(&mut self) {
        self.treap.clear();
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<&K> {
        self.treap.min().ok()
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<&K> {
        self.treap.max().ok()
    }

    /// Returns the key at the root of the underlying treap, the one that drew the highest
    /// priority. Returns `None` if the set is empty.
    pub fn peek(&self) -> Option<&K> {
        self.treap.peek().ok()
    }

    /// Removes and returns the key at the root of the underlying treap. Since priorities are
    /// random, this removes an arbitrary key in O(log n) expected time.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.pop(), Some(1));
    /// assert_eq!(set.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<K> {
        self.treap.pop().ok().map(|(key, _)| key)
    }

    /// Returns the underlying treap.
    pub fn treap(&self) -> &Treap<K, u32, MaxPriority> {
        &self.treap
    }
}

impl<K> Default for TreapSet<K>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::TreapSet;

    #[test]
    fn test_len_empty() {
        let set: TreapSet<u32> = TreapSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let set: TreapSet<u32> = TreapSet::new();
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
        assert_eq!(set.peek(), None);
    }

    #[test]
    fn test_insert() {
        let mut set = TreapSet::new();
        assert!(set.insert(1));
        assert!(set.contains(&1));
        assert_eq!(set.peek(), Some(&1));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut set = TreapSet::new();
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
        assert_eq!(set.treap().len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = TreapSet::new();
        set.insert(1);
        assert!(set.remove(&1));
        assert!(!set.contains(&1));
        assert!(!set.remove(&1));
    }

    #[test]
    fn test_min_max() {
        let mut set = TreapSet::from_seed([1, 1, 1, 1]);
        set.insert(3);
        set.insert(1);
        set.insert(5);

        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&5));
        assert_eq!(set.treap().check_invariants(), Ok(()));
    }

    #[test]
    fn test_pop_drains() {
        let mut set = TreapSet::new();
        for key in 0..100 {
            set.insert(key);
        }
        let mut drained = Vec::new();
        while let Some(key) = set.pop() {
            assert_eq!(set.treap().check_invariants(), Ok(()));
            drained.push(key);
        }
        drained.sort();
        assert_eq!(drained, (0..100).collect::<Vec<u32>>());
        assert!(set.is_empty());
    }

    #[test]
    fn test_same_seed_same_shape() {
        let mut set_1 = TreapSet::from_seed([1, 2, 3, 4]);
        let mut set_2 = TreapSet::from_seed([1, 2, 3, 4]);
        for key in 0..50 {
            set_1.insert(key);
            set_2.insert(key);
        }
        assert_eq!(set_1.treap().to_string(), set_2.treap().to_string());
    }

    #[test]
    fn test_clear() {
        let mut set = TreapSet::new();
        set.insert(1);
        set.insert(2);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.min(), None);
    }
}
