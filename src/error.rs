//! Errors reported by treap operations.

use std::fmt;
use thiserror::Error;

/// The side a rotation promotes a node from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Promotes a left child above its parent.
    Right,
    /// Promotes a right child above its parent.
    Left,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Right => write!(f, "right"),
            Direction::Left => write!(f, "left"),
        }
    }
}

/// A structural invariant of a treap.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Invariant {
    /// A left child has a greater key than its parent, or a right child a smaller one.
    KeyOrder,
    /// A child outranks its parent.
    HeapOrder,
    /// A parent back-link disagrees with the node that owns the child.
    ParentLink,
    /// A stored node cannot be reached from the root, or a link points at a released node.
    Unreachable,
    /// A node is reachable along more than one path.
    Cycle,
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            Invariant::KeyOrder => "key order",
            Invariant::HeapOrder => "heap order",
            Invariant::ParentLink => "parent link",
            Invariant::Unreachable => "reachability",
            Invariant::Cycle => "acyclicity",
        };
        write!(f, "{}", description)
    }
}

/// Errors reported by a treap.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum TreapError {
    /// The operation needs at least one node.
    #[error("the treap is empty")]
    EmptyCollection,
    /// A rotation was requested on a node that does not satisfy its preconditions. Nothing was
    /// relinked.
    #[error("invalid {direction} rotation: {reason}")]
    InvalidRotation {
        direction: Direction,
        reason: &'static str,
    },
    /// The node graph no longer satisfies one of the treap invariants.
    #[error("{0} invariant violated")]
    InvariantViolation(Invariant),
}
