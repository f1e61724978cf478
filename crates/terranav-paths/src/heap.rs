//! Binary min-heap whose items remember their own slot.
//!
//! The heap stores ids into a caller-owned arena. Every item records its
//! current slot through [`HeapItem::set_heap_index`], so the owner can ask
//! for a re-sift after lowering (or raising) an item's key without a linear
//! search.

use std::cmp::Ordering;

use thiserror::Error;

/// An element that can sit in an [`IndexedMinHeap`].
pub trait HeapItem {
    /// Slot in the heap, `None` when not queued.
    fn heap_index(&self) -> Option<usize>;
    fn set_heap_index(&mut self, index: Option<usize>);
    /// Ordering used by the heap; `Less` pops first.
    fn heap_cmp(&self, other: &Self) -> Ordering;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("heap is full (capacity {capacity})")]
    Full { capacity: usize },
    #[error("heap is empty")]
    Empty,
    #[error("item {id} is not queued")]
    NotQueued { id: usize },
}

/// Indexed binary min-heap over ids into an external `&mut [T]` arena.
#[derive(Debug, Clone, Default)]
pub struct IndexedMinHeap {
    slots: Vec<usize>,
    max_len: Option<usize>,
}

impl IndexedMinHeap {
    /// Growable heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Heap refusing more than `max_len` queued items.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            slots: Vec::with_capacity(max_len),
            max_len: Some(max_len),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// Id of the minimum item without removing it.
    #[inline]
    pub fn peek(&self) -> Option<usize> {
        self.slots.first().copied()
    }

    /// Whether `id` is currently queued.
    pub fn contains<T: HeapItem>(&self, items: &[T], id: usize) -> bool {
        items
            .get(id)
            .and_then(HeapItem::heap_index)
            .is_some_and(|slot| self.slots.get(slot) == Some(&id))
    }

    /// Dequeue everything, resetting the items' slots.
    pub fn clear<T: HeapItem>(&mut self, items: &mut [T]) {
        for id in self.slots.drain(..) {
            if let Some(item) = items.get_mut(id) {
                item.set_heap_index(None);
            }
        }
    }

    /// Queue `id`. Queuing an already queued id re-sifts it instead.
    pub fn add<T: HeapItem>(&mut self, items: &mut [T], id: usize) -> Result<(), HeapError> {
        if self.contains(items, id) {
            return self.update(items, id);
        }
        if let Some(capacity) = self.max_len {
            if self.slots.len() >= capacity {
                return Err(HeapError::Full { capacity });
            }
        }
        if id >= items.len() {
            return Err(HeapError::NotQueued { id });
        }
        let slot = self.slots.len();
        self.slots.push(id);
        items[id].set_heap_index(Some(slot));
        self.sift_up(items, slot);
        Ok(())
    }

    /// Remove and return the minimum id.
    pub fn remove_min<T: HeapItem>(&mut self, items: &mut [T]) -> Result<usize, HeapError> {
        if self.slots.is_empty() {
            return Err(HeapError::Empty);
        }
        let last = self.slots.len() - 1;
        self.swap(items, 0, last);
        let id = self.slots.pop().ok_or(HeapError::Empty)?;
        items[id].set_heap_index(None);
        if !self.slots.is_empty() {
            self.sift_down(items, 0);
        }
        Ok(id)
    }

    /// Restore heap order after the key of queued `id` changed.
    pub fn update<T: HeapItem>(&mut self, items: &mut [T], id: usize) -> Result<(), HeapError> {
        if !self.contains(items, id) {
            return Err(HeapError::NotQueued { id });
        }
        let Some(slot) = items[id].heap_index() else {
            return Err(HeapError::NotQueued { id });
        };
        let slot = self.sift_up(items, slot);
        self.sift_down(items, slot);
        Ok(())
    }

    /// Check ordering and back references. Meant for tests and debug
    /// assertions.
    pub fn is_valid<T: HeapItem>(&self, items: &[T]) -> bool {
        self.slots.iter().enumerate().all(|(slot, &id)| {
            items.get(id).and_then(HeapItem::heap_index) == Some(slot)
                && (slot == 0
                    || items[self.slots[(slot - 1) / 2]].heap_cmp(&items[id]) != Ordering::Greater)
        })
    }

    // ------------------------------------------------------------------

    fn less<T: HeapItem>(&self, items: &[T], a: usize, b: usize) -> bool {
        items[self.slots[a]].heap_cmp(&items[self.slots[b]]) == Ordering::Less
    }

    fn swap<T: HeapItem>(&mut self, items: &mut [T], a: usize, b: usize) {
        self.slots.swap(a, b);
        items[self.slots[a]].set_heap_index(Some(a));
        items[self.slots[b]].set_heap_index(Some(b));
    }

    fn sift_up<T: HeapItem>(&mut self, items: &mut [T], mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(items, slot, parent) {
                break;
            }
            self.swap(items, slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down<T: HeapItem>(&mut self, items: &mut [T], mut slot: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.less(items, left, smallest) {
                smallest = left;
            }
            if right < len && self.less(items, right, smallest) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(items, slot, smallest);
            slot = smallest;
        }
    }
}
