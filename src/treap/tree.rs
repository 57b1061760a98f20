use crate::arena::{Arena, Handle};
use crate::error::{Direction, Invariant, TreapError};
use crate::treap::comparator::{Comparator, MaxPriority};
use crate::treap::node::Node;
use log::{debug, error, trace};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

/// Number of nodes allocated at a time when no chunk size is given.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

fn corrupted(operation: &str, err: TreapError) -> ! {
    error!("treap corrupted during {}: {}", operation, err);
    panic!("treap corrupted during {}: {}", operation, err);
}

/// An ordered index implemented by a treap.
///
/// A treap is a binary search tree on keys that is also a heap on priorities: no node outranks
/// its parent under the comparator `C`. When priorities are drawn independently at random, the
/// expected height of the tree is logarithmic in the number of keys. The treap itself does not
/// generate priorities; see `TreapSet` for a collection that does.
///
/// Duplicate keys are allowed. An inserted key that equals an existing one descends to the left
/// of it. Nodes live in an arena owned by the treap and are addressed by handles, so dropping the
/// treap releases every node exactly once.
///
/// # Examples
/// ```
/// use treap_index::treap::Treap;
///
/// let mut t = Treap::new();
/// t.insert(5, 10);
/// t.insert(3, 20);
/// t.insert(8, 15);
///
/// assert_eq!(t.peek(), Ok(&3));
/// assert_eq!(t.min(), Ok(&3));
/// assert_eq!(t.max(), Ok(&8));
/// assert_eq!(t.search(&8).map(|node| *node.priority()), Some(15));
///
/// assert!(t.remove(&3));
/// assert!(!t.remove(&3));
/// assert_eq!(t.peek(), Ok(&8));
/// ```
pub struct Treap<K, P, C = MaxPriority> {
    arena: Arena<Node<K, P>>,
    root: Option<Handle>,
    comparator: C,
}

impl<K, P> Treap<K, P>
where
    K: Ord,
    P: PartialOrd,
{
    /// Constructs a new, empty `Treap<K, P>` where larger priorities sit closer to the root.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::Treap;
    ///
    /// let t: Treap<u32, u32> = Treap::new();
    /// assert!(t.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(MaxPriority)
    }
}

impl<K, P, C> Treap<K, P, C>
where
    K: Ord,
    C: Comparator<P>,
{
    /// Constructs a new, empty treap ranked by `comparator`.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::{MinPriority, Treap};
    ///
    /// let mut t = Treap::with_comparator(MinPriority);
    /// t.insert("a", 2.5);
    /// t.insert("b", 0.5);
    /// assert_eq!(t.peek(), Ok(&"b"));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_chunk_size(comparator, DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty treap ranked by `comparator` whose node arena grows by
    /// `chunk_size` nodes at a time.
    pub fn with_chunk_size(comparator: C, chunk_size: usize) -> Self {
        Treap {
            arena: Arena::new(chunk_size),
            root: None,
            comparator,
        }
    }

    fn outranks(&self, lhs: Handle, rhs: Handle) -> bool {
        self.comparator
            .outranks(&self.arena[lhs].priority, &self.arena[rhs].priority)
    }

    fn find(&self, key: &K) -> Option<Handle> {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(&node.key) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    // The child that a downward sift would promote. Equal priorities promote the left child.
    fn dominant_child(&self, handle: Handle) -> Option<Handle> {
        let node = &self.arena[handle];
        match (node.left, node.right) {
            (Some(left), Some(right)) => {
                if self.outranks(right, left) {
                    Some(right)
                } else {
                    Some(left)
                }
            }
            (left, right) => left.or(right),
        }
    }

    fn rotate(&mut self, handle: Handle, direction: Direction) -> Result<(), TreapError> {
        let invalid = move |reason: &'static str| TreapError::InvalidRotation { direction, reason };

        let node = self
            .arena
            .get(handle)
            .ok_or_else(|| invalid("node is not in the treap"))?;
        let parent = node.parent.ok_or_else(|| invalid("node is the root"))?;
        let parent_node = self
            .arena
            .get(parent)
            .ok_or_else(|| invalid("parent is not in the treap"))?;
        let (is_expected_child, inner) = match direction {
            Direction::Right => (parent_node.left == Some(handle), node.right),
            Direction::Left => (parent_node.right == Some(handle), node.left),
        };
        if !is_expected_child {
            return Err(invalid(match direction {
                Direction::Right => "node is not the left child of its parent",
                Direction::Left => "node is not the right child of its parent",
            }));
        }
        let grandparent = parent_node.parent;
        if grandparent.map_or(false, |gp| !self.arena.contains(gp))
            || inner.map_or(false, |inner| !self.arena.contains(inner))
        {
            return Err(invalid("neighbouring node is not in the treap"));
        }

        // Every link below is known to be live; relink without further checks.
        match grandparent {
            Some(gp) => {
                let gp_node = &mut self.arena[gp];
                if gp_node.left == Some(parent) {
                    gp_node.left = Some(handle);
                } else {
                    gp_node.right = Some(handle);
                }
            }
            None => self.root = Some(handle),
        }
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(parent);
        }
        match direction {
            Direction::Right => {
                self.arena[parent].left = inner;
                self.arena[handle].right = Some(parent);
            }
            Direction::Left => {
                self.arena[parent].right = inner;
                self.arena[handle].left = Some(parent);
            }
        }
        self.arena[handle].parent = grandparent;
        self.arena[parent].parent = Some(handle);

        trace!(
            "{} rotation{}",
            direction,
            if grandparent.is_none() { ", new root" } else { "" },
        );
        Ok(())
    }

    /// Promotes a left child above its parent.
    fn rotate_right(&mut self, handle: Handle) -> Result<(), TreapError> {
        self.rotate(handle, Direction::Right)
    }

    /// Promotes a right child above its parent.
    fn rotate_left(&mut self, handle: Handle) -> Result<(), TreapError> {
        self.rotate(handle, Direction::Left)
    }

    fn promote(&mut self, handle: Handle) -> Result<(), TreapError> {
        let is_left_child = match self.arena.get(handle).and_then(|node| node.parent) {
            Some(parent) => self.arena[parent].left == Some(handle),
            None => false,
        };
        if is_left_child {
            self.rotate_right(handle)
        } else {
            self.rotate_left(handle)
        }
    }

    fn sift_up(&mut self, handle: Handle) -> Result<(), TreapError> {
        while let Some(parent) = self.arena[handle].parent {
            if !self.outranks(handle, parent) {
                break;
            }
            self.promote(handle)?;
        }
        Ok(())
    }

    fn sift_down(&mut self, handle: Handle) -> Result<(), TreapError> {
        while let Some(child) = self.dominant_child(handle) {
            if !self.outranks(child, handle) {
                break;
            }
            self.promote(child)?;
        }
        Ok(())
    }

    // Rotates the node down until it is a leaf, then unlinks and releases it.
    fn take(&mut self, handle: Handle) -> Result<Node<K, P>, TreapError> {
        while let Some(child) = self.dominant_child(handle) {
            self.promote(child)?;
        }
        match self.arena[handle].parent {
            Some(parent) => {
                let parent_node = &mut self.arena[parent];
                if parent_node.left == Some(handle) {
                    parent_node.left = None;
                } else {
                    parent_node.right = None;
                }
            }
            None => self.root = None,
        }
        self.arena
            .remove(handle)
            .ok_or(TreapError::InvariantViolation(Invariant::Unreachable))
    }

    /// Inserts a key with a priority into the treap. Keys equal to an existing key are placed in
    /// its left subtree.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::Treap;
    ///
    /// let mut t = Treap::new();
    /// t.insert(1, 10);
    /// t.insert(1, 20);
    /// assert_eq!(t.len(), 2);
    /// assert_eq!(t.root().map(|node| *node.priority()), Some(20));
    /// ```
    pub fn insert(&mut self, key: K, priority: P) {
        trace!("enter insert");
        let mut parent = None;
        let mut goes_left = false;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            parent = Some(handle);
            goes_left = key <= node.key;
            curr = if goes_left { node.left } else { node.right };
        }

        let handle = self.arena.insert(Node::new(key, priority, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) if goes_left => self.arena[parent].left = Some(handle),
            Some(parent) => self.arena[parent].right = Some(handle),
        }

        if let Err(err) = self.sift_up(handle) {
            corrupted("insert", err);
        }
        trace!("exit insert");
    }

    /// Removes a node with a particular key from the treap. Returns `false` if there is no such
    /// key, in which case the treap is left untouched.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::Treap;
    ///
    /// let mut t = Treap::new();
    /// t.insert(1, 1);
    /// assert!(t.remove(&1));
    /// assert!(!t.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        trace!("enter remove");
        let removed = match self.find(key) {
            Some(handle) => match self.take(handle) {
                Ok(_) => true,
                Err(err) => corrupted("remove", err),
            },
            None => false,
        };
        trace!("exit remove");
        removed
    }

    /// Removes the node with the highest ranked priority and returns its key and priority.
    ///
    /// # Examples
    /// ```
    /// use treap_index::{treap::Treap, TreapError};
    ///
    /// let mut t = Treap::new();
    /// t.insert("a", 1);
    /// t.insert("b", 2);
    /// assert_eq!(t.pop(), Ok(("b", 2)));
    /// assert_eq!(t.pop(), Ok(("a", 1)));
    /// assert_eq!(t.pop(), Err(TreapError::EmptyCollection));
    /// ```
    pub fn pop(&mut self) -> Result<(K, P), TreapError> {
        let root = self.root.ok_or(TreapError::EmptyCollection)?;
        let node = self
            .take(root)
            .unwrap_or_else(|err| corrupted("pop", err));
        debug!("popped highest ranked node, {} remaining", self.len());
        Ok(node.into_entry())
    }

    /// Replaces the priority of a node with a particular key and moves the node to where the new
    /// priority ranks it. Returns `false` if there is no such key.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::Treap;
    ///
    /// let mut t = Treap::new();
    /// t.insert(1, 10);
    /// t.insert(2, 5);
    /// assert!(t.update_priority(&2, 50));
    /// assert_eq!(t.peek(), Ok(&2));
    /// assert!(!t.update_priority(&3, 1));
    /// ```
    pub fn update_priority(&mut self, key: &K, priority: P) -> bool {
        let handle = match self.find(key) {
            Some(handle) => handle,
            None => return false,
        };
        let raised = self
            .comparator
            .outranks(&priority, &self.arena[handle].priority);
        self.arena[handle].priority = priority;

        let restored = if raised {
            self.sift_up(handle)
        } else {
            self.sift_down(handle)
        };
        if let Err(err) = restored {
            corrupted("update_priority", err);
        }
        debug!("updated priority, raised: {}", raised);
        true
    }

    /// Returns the node with a particular key, or `None` if there is no such key. With duplicate
    /// keys, the one closest to the root is returned.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::Treap;
    ///
    /// let mut t = Treap::new();
    /// t.insert(1, 7);
    /// assert_eq!(t.search(&1).map(|node| *node.priority()), Some(7));
    /// assert!(t.search(&2).is_none());
    /// ```
    pub fn search(&self, key: &K) -> Option<&Node<K, P>> {
        self.find(key).map(|handle| &self.arena[handle])
    }

    /// Checks if a key exists in the treap.
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the root, which holds the highest ranked priority, or `None` if the treap is
    /// empty.
    pub fn root(&self) -> Option<&Node<K, P>> {
        self.root.map(|handle| &self.arena[handle])
    }

    /// Returns the key with the highest ranked priority.
    ///
    /// # Examples
    /// ```
    /// use treap_index::{treap::Treap, TreapError};
    ///
    /// let mut t = Treap::new();
    /// assert_eq!(t.peek(), Err(TreapError::EmptyCollection));
    /// t.insert(1, 1);
    /// t.insert(2, 3);
    /// assert_eq!(t.peek(), Ok(&2));
    /// ```
    pub fn peek(&self) -> Result<&K, TreapError> {
        self.root()
            .map(|node| &node.key)
            .ok_or(TreapError::EmptyCollection)
    }

    /// Returns the minimum key of the treap.
    ///
    /// # Examples
    /// ```
    /// use treap_index::{treap::Treap, TreapError};
    ///
    /// let mut t = Treap::new();
    /// assert_eq!(t.min(), Err(TreapError::EmptyCollection));
    ///
    /// t.insert(5, 10);
    /// t.insert(3, 20);
    /// t.insert(8, 15);
    /// assert_eq!(t.min(), Ok(&3));
    /// ```
    pub fn min(&self) -> Result<&K, TreapError> {
        let mut curr = self.root.ok_or(TreapError::EmptyCollection)?;
        while let Some(left) = self.arena[curr].left {
            curr = left;
        }
        Ok(&self.arena[curr].key)
    }

    /// Returns the maximum key of the treap.
    ///
    /// # Examples
    /// ```
    /// use treap_index::{treap::Treap, TreapError};
    ///
    /// let mut t = Treap::new();
    /// assert_eq!(t.max(), Err(TreapError::EmptyCollection));
    ///
    /// t.insert(5, 10);
    /// t.insert(3, 20);
    /// t.insert(8, 15);
    /// assert_eq!(t.max(), Ok(&8));
    /// ```
    pub fn max(&self) -> Result<&K, TreapError> {
        let mut curr = self.root.ok_or(TreapError::EmptyCollection)?;
        while let Some(right) = self.arena[curr].right {
            curr = right;
        }
        Ok(&self.arena[curr].key)
    }

    /// Returns the number of nodes in the treap.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the treap has no nodes.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Releases every node of the treap.
    pub fn clear(&mut self) {
        debug!("clearing {} nodes", self.len());
        self.root = None;
        self.arena.clear();
    }

    /// Checks that every node's key is ordered with respect to its direct children, visiting
    /// nodes in breadth-first order.
    ///
    /// # Examples
    /// ```
    /// use treap_index::treap::Treap;
    ///
    /// let mut t = Treap::new();
    /// for (key, priority) in vec![(5, 10), (3, 20), (8, 15)] {
    ///     t.insert(key, priority);
    /// }
    /// assert!(t.validate());
    /// ```
    pub fn validate(&self) -> bool {
        let mut queue: VecDeque<Handle> = self.root.into_iter().collect();
        let mut visited = 0;
        while let Some(handle) = queue.pop_front() {
            visited += 1;
            if visited > self.arena.len() {
                return false;
            }
            let node = match self.arena.get(handle) {
                Some(node) => node,
                None => return false,
            };
            if let Some(left) = node.left {
                match self.arena.get(left) {
                    Some(left_node) if left_node.key <= node.key => queue.push_back(left),
                    _ => return false,
                }
            }
            if let Some(right) = node.right {
                match self.arena.get(right) {
                    Some(right_node) if right_node.key >= node.key => queue.push_back(right),
                    _ => return false,
                }
            }
        }
        true
    }

    /// Checks every invariant of the treap: key order across whole subtrees, heap order, agreement
    /// between parent and child links, and that every stored node is reachable from the root
    /// exactly once. Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), TreapError> {
        let root = match self.root {
            Some(root) => root,
            None if self.arena.is_empty() => return Ok(()),
            None => return Err(TreapError::InvariantViolation(Invariant::Unreachable)),
        };
        match self.arena.get(root) {
            Some(node) if node.is_root() => {}
            Some(_) => return Err(TreapError::InvariantViolation(Invariant::ParentLink)),
            None => return Err(TreapError::InvariantViolation(Invariant::Unreachable)),
        }

        let mut queue: VecDeque<(Handle, Option<&K>, Option<&K>)> = VecDeque::new();
        queue.push_back((root, None, None));
        let mut visited = 0;
        while let Some((handle, lower, upper)) = queue.pop_front() {
            visited += 1;
            if visited > self.arena.len() {
                return Err(TreapError::InvariantViolation(Invariant::Cycle));
            }
            let node = &self.arena[handle];
            if lower.map_or(false, |lower| node.key < *lower)
                || upper.map_or(false, |upper| node.key > *upper)
            {
                return Err(TreapError::InvariantViolation(Invariant::KeyOrder));
            }

            for &(child, is_left) in &[(node.left, true), (node.right, false)] {
                let child = match child {
                    Some(child) => child,
                    None => continue,
                };
                let child_node = self
                    .arena
                    .get(child)
                    .ok_or(TreapError::InvariantViolation(Invariant::Unreachable))?;
                if child_node.parent != Some(handle) {
                    return Err(TreapError::InvariantViolation(Invariant::ParentLink));
                }
                if self.comparator.outranks(&child_node.priority, &node.priority) {
                    return Err(TreapError::InvariantViolation(Invariant::HeapOrder));
                }
                if is_left {
                    queue.push_back((child, lower, Some(&node.key)));
                } else {
                    queue.push_back((child, Some(&node.key), upper));
                }
            }
        }

        if visited != self.arena.len() {
            return Err(TreapError::InvariantViolation(Invariant::Unreachable));
        }
        Ok(())
    }
}

impl<K, P, C> Default for Treap<K, P, C>
where
    K: Ord,
    C: Comparator<P> + Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, P, C> fmt::Display for Treap<K, P, C>
where
    K: fmt::Display,
    P: fmt::Display,
{
    /// Writes one `(key, priority)` line per node in pre-order, indented two spaces per level.
    /// A missing child of a node that has the other child is written as `-`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut stack: Vec<(Option<Handle>, usize)> =
            self.root.map(|root| (Some(root), 0)).into_iter().collect();
        while let Some((handle, depth)) = stack.pop() {
            let indent = depth * 2;
            match handle {
                Some(handle) => {
                    let node = &self.arena[handle];
                    writeln!(
                        f,
                        "{:indent$}({}, {})",
                        "",
                        node.key,
                        node.priority,
                        indent = indent,
                    )?;
                    if !node.is_leaf() {
                        stack.push((node.right, depth + 1));
                        stack.push((node.left, depth + 1));
                    }
                }
                None => writeln!(f, "{:indent$}-", "", indent = indent)?,
            }
        }
        Ok(())
    }
}
