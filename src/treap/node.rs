use crate::arena::Handle;

/// A node of a treap: a key, its priority, and its links.
///
/// Child links own the child; the parent link is a back-reference that always names the unique
/// node holding this one as a child, or nothing for the root.
#[derive(Debug)]
pub struct Node<K, P> {
    pub(crate) key: K,
    pub(crate) priority: P,
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<K, P> Node<K, P> {
    pub(crate) fn new(key: K, priority: P, parent: Option<Handle>) -> Self {
        Node {
            key,
            priority,
            parent,
            left: None,
            right: None,
        }
    }

    /// Returns the key of the node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the priority of the node.
    pub fn priority(&self) -> &P {
        &self.priority
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns `true` if the node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn into_entry(self) -> (K, P) {
        (self.key, self.priority)
    }
}
