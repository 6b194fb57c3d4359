//! Read-only views over sampler storage.
//!
//! A [`SampleView`] borrows the backing slice of a sampler and projects each
//! stored entry to the element the caller cares about (identity for plain
//! reservoirs, the value half of a keyed entry for order sampling). Views are
//! constant-time to obtain and never copy; the borrow ends before the next
//! mutating call on the owning sampler.

use std::fmt;
use std::ops::Index;

/// A borrowed, projected, read-only view of a sample.
pub struct SampleView<'a, E, T: ?Sized> {
    entries: &'a [E],
    project: fn(&E) -> &T,
}

impl<'a, E, T: ?Sized + 'a> SampleView<'a, E, T> {
    pub(crate) fn new(entries: &'a [E], project: fn(&E) -> &T) -> Self {
        Self { entries, project }
    }

    /// Number of elements in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Element at position `i`, if any. Positions carry no meaning beyond
    /// the current storage layout.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&'a T> {
        let project = self.project;
        self.entries.get(i).map(project)
    }

    /// Iterate over the viewed elements.
    pub fn iter(&self) -> Iter<'a, E, T> {
        Iter {
            inner: self.entries.iter(),
            project: self.project,
        }
    }

    /// Copy the viewed elements out.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<E> SampleView<'_, E, E> {
    pub(crate) fn identity(x: &E) -> &E {
        x
    }
}

impl<E, T: ?Sized> Clone for SampleView<'_, E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T: ?Sized> Copy for SampleView<'_, E, T> {}

impl<E, T: ?Sized> Index<usize> for SampleView<'_, E, T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        (self.project)(&self.entries[i])
    }
}

impl<E, T: fmt::Debug + ?Sized> fmt::Debug for SampleView<'_, E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<E, T: PartialEq> PartialEq<[T]> for SampleView<'_, E, T> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<'a, E, T: ?Sized + 'a> IntoIterator for SampleView<'a, E, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, E, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, E, T: ?Sized + 'a> IntoIterator for &SampleView<'a, E, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, E, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`SampleView`].
pub struct Iter<'a, E, T: ?Sized> {
    inner: std::slice::Iter<'a, E>,
    project: fn(&E) -> &T,
}

impl<'a, E, T: ?Sized + 'a> Iterator for Iter<'a, E, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let project = self.project;
        self.inner.next().map(project)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, E, T: ?Sized + 'a> ExactSizeIterator for Iter<'a, E, T> {}

impl<E, T: ?Sized> Clone for Iter<'_, E, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            project: self.project,
        }
    }
}
