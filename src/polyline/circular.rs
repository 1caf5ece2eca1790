//! An indexed sequence with open or closed (looping) topology.

use std::ops::Index;

/// Ordered samples plus a flag telling whether index arithmetic wraps.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorC<T> {
    items: Vec<T>,
    closed: bool,
}

impl<T> VectorC<T> {
    pub const fn new(items: Vec<T>, closed: bool) -> Self {
        VectorC { items, closed }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Index following `idx`, wrapping for closed sequences.
    pub fn next_index(&self, idx: usize) -> Option<usize> {
        assert!(idx < self.len(), "index {idx} out of range (len = {})", self.len());
        if idx + 1 < self.len() {
            Some(idx + 1)
        } else if self.closed {
            Some(0)
        } else {
            None
        }
    }

    /// Index preceding `idx`, wrapping for closed sequences.
    pub fn prev_index(&self, idx: usize) -> Option<usize> {
        assert!(idx < self.len(), "index {idx} out of range (len = {})", self.len());
        if idx > 0 {
            Some(idx - 1)
        } else if self.closed {
            Some(self.len() - 1)
        } else {
            None
        }
    }

    /// Lazy forward traversal starting at `start`.
    ///
    /// Every sample is visited at most once: an open sequence stops after the
    /// last sample, a closed one stops just before coming back to `start`.
    pub fn circulator(&self, start: usize) -> Circulator<'_, T> {
        assert!(
            start < self.len(),
            "circulator start {start} out of range (len = {})",
            self.len()
        );
        Circulator {
            vec: self,
            start,
            idx: Some(start),
        }
    }
}

impl<T> Index<usize> for VectorC<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.items[idx]
    }
}

impl<T> From<Vec<T>> for VectorC<T> {
    fn from(items: Vec<T>) -> Self {
        VectorC::new(items, false)
    }
}

/// Forward cursor over a [`VectorC`], also usable as an iterator of
/// `(index, &item)`.
#[derive(Debug, Clone)]
pub struct Circulator<'a, T> {
    vec: &'a VectorC<T>,
    start: usize,
    idx: Option<usize>,
}

impl<'a, T> Circulator<'a, T> {
    /// Current index. Panics once the traversal is done.
    pub fn index(&self) -> usize {
        self.idx.expect("circulator is done")
    }

    pub const fn done(&self) -> bool {
        self.idx.is_none()
    }

    /// Current item. Panics once the traversal is done.
    pub fn get(&self) -> &'a T {
        &self.vec[self.index()]
    }

    /// Moves to the next sample.
    pub fn advance(&mut self) {
        self.idx = self
            .idx
            .and_then(|idx| self.vec.next_index(idx))
            .filter(|&next| next != self.start);
    }
}

impl<'a, T> Iterator for Circulator<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.idx?;
        self.advance();
        Some((idx, &self.vec[idx]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.idx {
            None => 0,
            Some(idx) if self.vec.closed => (self.start + self.vec.len() - idx - 1) % self.vec.len() + 1,
            Some(idx) => self.vec.len() - idx,
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Circulator<'_, T> {}
