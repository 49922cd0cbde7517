use std::{
    cmp::Ordering,
    fmt::{self, Write as _},
    iter::FusedIterator,
    mem, slice,
};

use log::{debug, trace};

use crate::error::HeapError;

/// Orders by `Ord`, so the largest element is the extreme one.
pub fn natural_order<T: Ord>(a: &T, b: &T) -> Ordering {
    a.cmp(b)
}

/// Reverses `Ord`, so the smallest element is the extreme one.
pub fn reverse_order<T: Ord>(a: &T, b: &T) -> Ordering {
    b.cmp(a)
}

//           0
//     1            2
//  3     4      5     6
#[inline]
fn left(n: usize) -> usize {
    2 * n + 1
}

#[inline]
fn right(n: usize) -> usize {
    2 * n + 2
}

#[inline]
fn parent(n: usize) -> usize {
    (n - 1) / 2
}

/// A binary heap over a fixed number of slots.
///
/// `order(a, b) == Ordering::Greater` means `a` is more extreme than `b` and
/// sits closer to the root. Live elements always occupy `slots[..size]`,
/// every slot past `size` is `None`.
pub struct Heap<T, F = fn(&T, &T) -> Ordering> {
    slots: Box<[Option<T>]>,
    size: usize,
    order: F,
}

impl<T: Ord> Heap<T> {
    /// Empty max-heap of the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, natural_order)
    }

    /// Full max-heap built from `elements`.
    pub fn from_vec(elements: Vec<T>) -> Self {
        Self::from_vec_by(elements, natural_order)
    }
}

impl<T, F> Heap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Builds an empty heap able to hold `capacity` elements.
    ///
    /// Complexity: O(capacity) to allocate the slots.
    pub fn new(capacity: usize, order: F) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            size: 0,
            order,
        }
    }

    /// Takes ownership of `elements` and arranges them into a heap.
    /// The capacity is `elements.len()`, so the result is full.
    ///
    /// Complexity: O(n).
    pub fn from_vec_by(elements: Vec<T>, order: F) -> Self {
        let size = elements.len();
        let mut heap = Self {
            slots: elements.into_iter().map(Some).collect(),
            size,
            order,
        };
        heap.build();
        heap
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.size == self.slots.len()
    }

    /// Returns the extreme element without removing it.
    pub fn extreme(&self) -> Result<&T, HeapError> {
        if self.size == 0 {
            return Err(HeapError::Empty);
        }
        Ok(self.at(0))
    }

    /// Inserts `value`, failing when every slot is taken.
    ///
    /// Complexity: O(log size).
    pub fn add(&mut self, value: T) -> Result<(), HeapError> {
        if self.is_full() {
            return Err(HeapError::Full {
                capacity: self.capacity(),
            });
        }
        self.slots[self.size] = Some(value);
        self.size += 1;
        self.sift_up(self.size - 1);
        Ok(())
    }

    /// Removes and returns the extreme element.
    ///
    /// Complexity: O(log size).
    pub fn delete_extreme(&mut self) -> Result<T, HeapError> {
        if self.size == 0 {
            return Err(HeapError::Empty);
        }
        let extreme = self.detach(0);
        if self.size > 0 {
            self.sift_down(0);
        }
        Ok(extreme)
    }

    /// Removes the first element, in storage order, that compares equal to
    /// `value`. Returns whether anything was removed.
    ///
    /// Complexity: O(size).
    pub fn delete(&mut self, value: &T) -> bool {
        let found = (0..self.size).find(|&i| self.matches(i, value));
        let Some(index) = found else {
            return false;
        };
        self.detach(index);
        // The element moved into `index` may belong above or below it.
        if index < self.size {
            self.sift_up(index);
            self.sift_down(index);
        }
        true
    }

    /// Removes every element that compares equal to `value`, then rebuilds
    /// the whole heap. Returns the number of elements removed.
    ///
    /// Complexity: O(size).
    pub fn delete_all(&mut self, value: &T) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.size {
            if self.matches(i, value) {
                // `i` now holds what was the last element, look at it again.
                self.detach(i);
                removed += 1;
            } else {
                i += 1;
            }
        }
        debug!("removed {removed} matching elements, rebuilding");
        self.build();
        removed
    }

    /// Whether an element equal to `value` is found and sits at a slot without
    /// live children.
    ///
    /// The search prunes every subtree whose root is strictly less extreme than
    /// `value`, which is exhaustive only when `order` is a total order. With
    /// duplicates the first match reached decides the answer.
    pub fn is_leaf(&self, value: &T) -> bool {
        self.find(value, 0).is_some_and(|index| self.is_leaf_at(index))
    }

    /// Whether `index` is a live slot with no live children.
    pub fn is_leaf_at(&self, index: usize) -> bool {
        index < self.size && left(index) >= self.size && right(index) >= self.size
    }

    /// The whole fixed storage, vacated slots included.
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    /// Iterates live elements in storage order, root first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots[..self.size].iter(),
        }
    }

    /// Renders the live elements one tree level per line, each written as
    /// `(index)value `.
    pub fn by_levels(&self) -> String
    where
        T: fmt::Display,
    {
        let mut out = String::new();
        let mut width = 1;
        let mut level_end = 1;
        for (i, value) in self.iter().enumerate() {
            if i == level_end {
                out.push('\n');
                width *= 2;
                level_end += width;
            }
            // Writing into a String cannot fail.
            let _ = write!(out, "({i}){value} ");
        }
        out
    }

    fn at(&self, index: usize) -> &T {
        match self.slots[index].as_ref() {
            Some(value) => value,
            None => unreachable!("slot {index} is vacant below size {}", self.size),
        }
    }

    fn matches(&self, index: usize, value: &T) -> bool {
        (self.order)(self.at(index), value) == Ordering::Equal
    }

    fn precedes(&self, a: usize, b: usize) -> bool {
        (self.order)(self.at(a), self.at(b)) == Ordering::Greater
    }

    /// Moves the last live element into `index`, shrinks the heap and clears
    /// the vacated slot. Returns the element that was at `index`.
    fn detach(&mut self, index: usize) -> T {
        self.size -= 1;
        let last = self.slots[self.size].take();
        let removed = if index == self.size {
            last
        } else {
            mem::replace(&mut self.slots[index], last)
        };
        match removed {
            Some(value) => value,
            None => unreachable!("slot {index} is vacant below size {}", self.size + 1),
        }
    }

    fn sift_up(&mut self, mut n: usize) {
        while n > 0 && n < self.size && self.precedes(n, parent(n)) {
            self.slots.swap(n, parent(n));
            n = parent(n);
        }
    }

    fn sift_down(&mut self, mut n: usize) {
        loop {
            trace!("percolate down from slot {n}");
            let mut best = n;
            if left(n) < self.size && self.precedes(left(n), best) {
                best = left(n);
            }
            // Ties between children go to the left one.
            if right(n) < self.size && self.precedes(right(n), best) {
                best = right(n);
            }
            if best == n {
                return;
            }
            self.slots.swap(best, n);
            n = best;
        }
    }

    fn build(&mut self) {
        if self.size < 2 {
            return;
        }
        for i in (0..=parent(self.size - 1)).rev() {
            self.sift_down(i);
        }
        debug!("built heap over {} elements", self.size);
    }

    fn find(&self, value: &T, from: usize) -> Option<usize> {
        if from >= self.size {
            return None;
        }
        trace!("searching from slot {from}");
        match (self.order)(value, self.at(from)) {
            Ordering::Equal => Some(from),
            Ordering::Less => self
                .find(value, right(from))
                .or_else(|| self.find(value, left(from))),
            // Every descendant is at most as extreme as `from`.
            Ordering::Greater => None,
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Heap<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let elements: Vec<&T> = self.slots[..self.size].iter().flatten().collect();
        f.debug_struct("Heap")
            .field("elements", &elements)
            .field("size", &self.size)
            .field("capacity", &self.slots.len())
            .finish()
    }
}

impl<'a, T, F> IntoIterator for &'a Heap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over the live elements of a [`Heap`].
pub struct Iter<'a, T: 'a> {
    inner: slice::Iter<'a, Option<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| match slot {
            Some(value) => value,
            None => unreachable!("vacant slot among live elements"),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}
