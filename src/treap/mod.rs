//! Binary search tree on keys where each node also maintains a heap invariant on priorities.

mod comparator;
mod node;
mod set;
mod tree;

pub use self::comparator::{Comparator, MaxPriority, MinPriority};
pub use self::node::Node;
pub use self::set::TreapSet;
pub use self::tree::{Treap, DEFAULT_CHUNK_SIZE};
