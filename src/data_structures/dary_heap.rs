use std::cmp::min;
use std::fmt::Debug;

const DEFAULT_ARITY: usize = 4usize;

/// A d-ary min-heap.
///
/// Wider nodes make the tree shallower, trading a few more comparisons when
/// sifting down for fewer cache misses. The smallest element sits at index 0.
#[derive(Debug, Clone)]
pub struct DaryHeap<T, const ARITY: usize = DEFAULT_ARITY>
where
    T: Ord + Debug,
{
    heap: Vec<T>,
}

impl<T, const ARITY: usize> DaryHeap<T, ARITY>
where
    T: Ord + Debug,
{
    #[inline(always)]
    #[must_use]
    fn up(i: usize) -> usize {
        crate::heap_primitives::index_parent::<ARITY>(i)
    }
    #[inline(always)]
    #[must_use]
    fn down_left(i: usize) -> usize {
        crate::heap_primitives::index_first_child::<ARITY>(i)
    }
    #[inline(always)]
    #[must_use]
    fn down_right(i: usize) -> usize {
        crate::heap_primitives::index_last_child::<ARITY>(i)
    }

    #[must_use]
    pub fn new() -> Self {
        debug_assert!(ARITY >= 2, "A heap needs at least 2 children per node");
        Self { heap: vec![] }
    }
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        debug_assert!(ARITY >= 2, "A heap needs at least 2 children per node");
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    /// The smallest element, if any.
    #[inline(always)]
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Adds an element, returning the index it settled on.
    pub fn push(&mut self, item: T) -> usize {
        self.verify_heap();
        let index = self.heap.len();
        self.heap.push(item);
        let index = self.sift_up(index);
        self.verify_heap();
        index
    }

    /// Removes the smallest element.
    pub fn pop(&mut self) -> Option<T> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("HeapPop");

        self.verify_heap();
        let len = self.heap.len();
        if len <= 1 {
            return self.heap.pop();
        }

        // Move the last leaf to the root and let it sink.
        let top = self.heap.swap_remove(0);
        self.sift_down(0);

        self.verify_heap();
        Some(top)
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        // All good... (hopefully)
    }

    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        for i in 1..self.heap.len() {
            let p = Self::up(i);
            debug_assert!(
                self.heap[p] <= self.heap[i],
                "Node[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={}",
                self.heap[p],
                self.heap[i],
                self.heap.len(),
            );
        }
    }

    /// Index of the smallest child of `index`, if it has any children.
    #[inline(always)]
    fn best_child(&self, index: usize) -> Option<usize> {
        let len = self.heap.len();
        let first = Self::down_left(index);
        if first >= len {
            return None;
        }
        debug_assert_eq!(first + ARITY, Self::down_right(index) + 1);
        let last = min(Self::down_right(index), len - 1);

        let mut best = first;
        for child in (first + 1)..=last {
            if self.heap[child] < self.heap[best] {
                best = child;
            }
        }
        Some(best)
    }

    /// Raises a node
    /// Returns its new index
    fn sift_up(&mut self, mut index: usize) -> usize {
        debug_assert!(index < self.heap.len(), "Index out of bounds");

        while index > 0 {
            let parent = Self::up(index);
            if self.heap[parent] <= self.heap[index] {
                break;
            }
            self.heap.swap(parent, index);
            index = parent;
        }
        index
    }

    /// Lowers a node
    /// Returns its new index
    fn sift_down(&mut self, mut index: usize) -> usize {
        debug_assert!(index < self.heap.len(), "Index out of bounds");

        while let Some(child) = self.best_child(index) {
            if self.heap[index] <= self.heap[child] {
                break;
            }
            self.heap.swap(index, child);
            index = child;
        }
        index
    }
}

impl<T, const ARITY: usize> Default for DaryHeap<T, ARITY>
where
    T: Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_works() {
        let mut heap = DaryHeap::<String>::new();
        assert!(heap.is_empty());

        heap.push("aoeu".to_string());
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.pop(), Some("aoeu".to_string()));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn heap_sorts() {
        let mut heap = DaryHeap::<&str>::new();

        assert_eq!(heap.push("c"), 0usize);
        assert_eq!(heap.push("e"), 1usize);
        assert_eq!(heap.push("f"), 2usize);
        assert_eq!(heap.push("a"), 0usize);
        assert_eq!(heap.push("d"), 4usize);
        assert_eq!(heap.push("b"), 1usize);

        assert_eq!(heap.peek(), Some(&"a"));
        for expected in ["a", "b", "c", "d", "e", "f"] {
            assert_eq!(heap.pop(), Some(expected));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn binary_and_wide_heaps_agree() {
        let values: Vec<u32> = (0..200u32).map(|i| (i * 7919) % 211).collect();

        let mut binary = DaryHeap::<u32, 2>::new();
        let mut wide = DaryHeap::<u32, 8>::with_capacity(values.len());
        for v in &values {
            binary.push(*v);
            wide.push(*v);
        }

        let mut sorted = values.clone();
        sorted.sort();
        for v in sorted {
            assert_eq!(binary.pop(), Some(v));
            assert_eq!(wide.pop(), Some(v));
        }
    }

    #[test]
    fn keeps_duplicates() {
        let mut heap = DaryHeap::<u8>::new();
        for v in [3u8, 1, 3, 1, 2] {
            heap.push(v);
        }
        let drained: Vec<u8> = std::iter::from_fn(|| heap.pop()).collect();
        assert_eq!(drained, vec![1, 1, 2, 3, 3]);
    }
}
