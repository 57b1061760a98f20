//! A randomized balanced ordered-key index.
//!
//! The core is `treap::Treap`, a binary search tree on keys that keeps a heap order on an
//! independent priority through rotations. Nodes live in an `arena::Arena` and are addressed by
//! stable handles.

pub mod arena;
mod error;
pub mod treap;

pub use crate::error::{Direction, Invariant, TreapError};
