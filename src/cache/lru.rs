//! LRU Order Module
//!
//! Recency ordering for cache entries, kept as a doubly linked list whose
//! nodes live in an arena and link to each other by slot index.

// == Slot ==
struct Slot<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
/// Doubly linked recency list over an arena of slots.
///
/// - Front (head) = Most recently used
/// - Back (tail) = Least recently used
///
/// Handles returned by `push_front` stay valid until the element is removed
/// or the list is cleared. Vacated slots are recycled through a free list.
pub struct LruList<T> {
    slots: Vec<Option<Slot<T>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty list with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a value as the most recently used element and returns its handle.
    pub fn push_front(&mut self, value: T) -> usize {
        let slot = Slot {
            value,
            prev: None,
            next: self.head,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                idx
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(head) => self.slot_mut(head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Marks an element as most recently used.
    ///
    /// Unknown handles are ignored.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) || !self.contains(idx) {
            return;
        }

        self.unlink(idx);

        let old_head = self.head;
        {
            let slot = self.slot_mut(idx);
            slot.prev = None;
            slot.next = old_head;
        }
        if let Some(head) = old_head {
            self.slot_mut(head).prev = Some(idx);
        }
        self.head = Some(idx);
    }

    // == Remove ==
    /// Removes an element and returns its value.
    ///
    /// Returns None for unknown handles.
    pub fn remove(&mut self, idx: usize) -> Option<T> {
        if !self.contains(idx) {
            return None;
        }

        self.unlink(idx);
        let slot = self.slots[idx].take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(slot.value)
    }

    // == Accessors ==
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx)?.as_ref().map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx)?.as_mut().map(|slot| &mut slot.value)
    }

    /// Handle of the most recently used element.
    pub fn front(&self) -> Option<usize> {
        self.head
    }

    /// Handle of the least recently used element.
    pub fn back(&self) -> Option<usize> {
        self.tail
    }

    /// Handle of the next more recently used neighbour of `idx`.
    pub fn prev(&self, idx: usize) -> Option<usize> {
        self.slots.get(idx)?.as_ref()?.prev
    }

    /// Handle of the next less recently used neighbour of `idx`.
    pub fn next(&self, idx: usize) -> Option<usize> {
        self.slots.get(idx)?.as_ref()?.next
    }

    // == Length ==
    /// Returns the number of linked elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every element and releases all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iter ==
    /// Iterates `(handle, value)` pairs from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn contains(&self, idx: usize) -> bool {
        matches!(self.slots.get(idx), Some(Some(_)))
    }

    // Callers only pass handles of linked slots.
    fn slot_mut(&mut self, idx: usize) -> &mut Slot<T> {
        match self.slots[idx].as_mut() {
            Some(slot) => slot,
            None => unreachable!("lru list link points at vacant slot {idx}"),
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(slot) => (slot.prev, slot.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => self.slot_mut(prev_idx).next = next,
            None => self.head = next,
        }

        match next {
            Some(next_idx) => self.slot_mut(next_idx).prev = prev,
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Front-to-back iterator over an [`LruList`].
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = self.list.slots.get(idx)?.as_ref()?;
        self.cursor = slot.next;
        Some((idx, &slot.value))
    }
}
