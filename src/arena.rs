//! Chunked typed arena that hands out stable handles.

use std::mem;
use std::ops::{Index, IndexMut};

/// A stable reference to a value stored in an `Arena<T>`.
///
/// Handles stay valid until the value is removed. A handle to a removed value never aliases
/// anything until its slot is reused by a later insertion.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk: usize,
    offset: usize,
}

enum Slot<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// An allocator for a single type of value, addressed by `Handle`s.
///
/// Storage grows one chunk at a time, so inserting never moves previously stored values. Vacated
/// slots are threaded onto a free list and reused before new slots are appended. Every value
/// still stored is dropped exactly once when the arena is dropped or cleared.
///
/// # Examples
///
/// ```
/// use treap_index::arena::Arena;
///
/// let mut arena = Arena::new(1024);
///
/// let x = arena.insert(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.remove(x), Some(2));
/// assert_eq!(arena.get(x), None);
/// ```
pub struct Arena<T> {
    free_head: Option<Handle>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> Arena<T> {
    fn slot(&self, handle: Handle) -> Option<&Slot<T>> {
        self.chunks
            .get(handle.chunk)
            .and_then(|chunk| chunk.get(handle.offset))
    }

    fn slot_mut(&mut self, handle: Handle) -> Option<&mut Slot<T>> {
        self.chunks
            .get_mut(handle.chunk)
            .and_then(|chunk| chunk.get_mut(handle.offset))
    }

    /// Constructs a new, empty `Arena<T>` that grows by `chunk_size` slots at a time. A chunk
    /// size of zero is treated as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_index::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new(1024);
    /// assert!(arena.is_empty());
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        Arena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            len: 0,
            capacity: 0,
        }
    }

    /// Stores a value and returns the handle that addresses it.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_index::arena::Arena;
    ///
    /// let mut arena = Arena::new(16);
    /// let x = arena.insert("a");
    /// assert_eq!(arena.get(x), Some(&"a"));
    /// ```
    pub fn insert(&mut self, value: T) -> Handle {
        if let Some(handle) = self.free_head {
            let slot = &mut self.chunks[handle.chunk][handle.offset];
            match mem::replace(slot, Slot::Occupied(value)) {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            }
            self.len += 1;
            return handle;
        }

        if self.len == self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }
        self.len += 1;

        let chunk = self.chunks.len() - 1;
        let last_chunk = &mut self.chunks[chunk];
        last_chunk.push(Slot::Occupied(value));
        Handle {
            chunk,
            offset: last_chunk.len() - 1,
        }
    }

    /// Removes the value addressed by `handle` and returns it. Returns `None` if the handle is
    /// out of range or its slot is already vacant.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_index::arena::Arena;
    ///
    /// let mut arena = Arena::new(16);
    /// let x = arena.insert(0);
    /// assert_eq!(arena.remove(x), Some(0));
    /// assert_eq!(arena.remove(x), None);
    /// ```
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let free_head = self.free_head;
        let slot = self.slot_mut(handle)?;
        if let Slot::Vacant(_) = slot {
            return None;
        }
        match mem::replace(slot, Slot::Vacant(free_head)) {
            Slot::Occupied(value) => {
                self.free_head = Some(handle);
                self.len -= 1;
                Some(value)
            }
            Slot::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to the value addressed by `handle`, or `None` if there is
    /// no such value.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slot(handle)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the value addressed by `handle`, or `None` if there is no
    /// such value.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slot_mut(handle)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    /// Returns `true` if `handle` addresses a stored value.
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Returns the number of stored values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena stores no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every stored value and releases all chunks.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_index::arena::Arena;
    ///
    /// let mut arena = Arena::new(16);
    /// let x = arena.insert(0);
    /// arena.clear();
    /// assert!(arena.is_empty());
    /// assert_eq!(arena.get(x), None);
    /// ```
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.free_head = None;
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle does not address a stored value.")
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle)
            .expect("Error: handle does not address a stored value.")
    }
}
