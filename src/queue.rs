use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::alloc::try_box;
use crate::element::{Element, Link};
use crate::error::QueueError;
use crate::sort::merge_sort;

/// What a removal wrote into the caller's buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Removal {
    /// Payload bytes copied, not counting the terminator.
    pub written: usize,
    /// Whether the payload was longer than the buffer could hold.
    pub truncated: bool,
}

/// A queue of owned strings kept in a singly-linked chain.
///
/// `head` owns the first node and every node owns its successor, all as raw
/// links to leaked boxes. `tail` is a second pointer to the last node of that
/// chain, used only to append in O(1); nothing is ever freed through it.
pub struct Queue {
    head: Link,
    tail: Link,
    size: usize,
    marker: PhantomData<Box<Element>>,
}

// SAFETY: every node reachable from `head` is owned by the queue alone, so
// moving the queue to another thread moves every node along with it.
unsafe impl Send for Queue {}

impl Queue {
    /// Creates an empty queue without allocating.
    pub const fn new() -> Queue {
        Queue {
            head: None,
            tail: None,
            size: 0,
            marker: PhantomData,
        }
    }

    /// Allocates an empty queue on the heap, reporting allocation failure
    /// instead of aborting.
    pub fn try_boxed() -> Result<Box<Queue>, QueueError> {
        try_box(Queue::new()).map_err(|_| {
            tracing::warn!("queue allocation failed");
            QueueError::QueueAlloc
        })
    }

    /// Releases every element and the queue itself.
    pub fn destroy(self) {
        tracing::trace!(released = self.size, "destroying queue");
        drop(self);
    }

    /// Releases every element, leaving the queue empty and usable.
    pub fn clear(&mut self) {
        while self.unlink_head().is_some() {}
    }

    /// Copies `text` into a new element in front of the current head.
    pub fn try_insert_head(&mut self, text: &str) -> Result<(), QueueError> {
        let node = Element::try_leaked(text)?;
        // SAFETY: `node` was just leaked and is not linked anywhere yet.
        unsafe { (*node.as_ptr()).next = self.head };
        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.size += 1;
        Ok(())
    }

    /// Copies `text` into a new element after the current tail.
    pub fn try_insert_tail(&mut self, text: &str) -> Result<(), QueueError> {
        let node = Element::try_leaked(text)?;
        match self.tail {
            None => self.head = Some(node),
            // SAFETY: a non-empty queue's tail is the live last node of the
            // chain, and `&mut self` rules out any other access to it.
            Some(tail) => unsafe { (*tail.as_ptr()).next = Some(node) },
        }
        self.tail = Some(node);
        self.size += 1;
        Ok(())
    }

    /// Returns `false` and leaves the queue untouched if the copy could not
    /// be allocated.
    pub fn insert_head(&mut self, text: &str) -> bool {
        self.try_insert_head(text).is_ok()
    }

    /// Returns `false` and leaves the queue untouched if the copy could not
    /// be allocated.
    pub fn insert_tail(&mut self, text: &str) -> bool {
        self.try_insert_tail(text).is_ok()
    }

    /// Unlinks and frees the head element.
    ///
    /// If `out` is given and not empty, the removed value is copied into it
    /// as a NUL-terminated byte string of at most `out.len() - 1` bytes.
    /// Longer values are cut short without complaint; the returned
    /// [`Removal`] says whether that happened.
    ///
    /// Bytes are copied as stored: a value holding a NUL of its own is copied
    /// past it, so a reader that stops at the first NUL sees only its prefix.
    /// `written` always counts every copied byte.
    pub fn try_remove_head(&mut self, out: Option<&mut [u8]>) -> Result<Removal, QueueError> {
        let node = self.unlink_head().ok_or(QueueError::Empty)?;

        let mut removal = Removal::default();
        if let Some(buf) = out.filter(|buf| !buf.is_empty()) {
            let bytes = node.value.as_bytes();
            let written = bytes.len().min(buf.len() - 1);
            buf[..written].copy_from_slice(&bytes[..written]);
            buf[written] = 0;

            removal.written = written;
            removal.truncated = written < bytes.len();
            if removal.truncated {
                tracing::trace!(len = bytes.len(), capacity = buf.len(), "removed value truncated");
            }
        }
        Ok(removal)
    }

    /// Same as [`Queue::try_remove_head`], returning `false` on an empty queue.
    pub fn remove_head(&mut self, out: Option<&mut [u8]>) -> bool {
        self.try_remove_head(out).is_ok()
    }

    /// Unlinks the head element and hands its value to the caller.
    pub fn pop_head(&mut self) -> Option<String> {
        self.unlink_head().map(|node| node.value)
    }

    fn unlink_head(&mut self) -> Option<Box<Element>> {
        let head = self.head?;
        // SAFETY: `head` is the live first node, owned by the queue; once it
        // is unlinked below nothing else points at it.
        let node = unsafe { Box::from_raw(head.as_ptr()) };
        self.head = node.next;
        self.size -= 1;
        if self.size == 0 {
            self.tail = None;
        }
        Some(node)
    }

    /// Number of elements in the queue. Kept as a counter, never recounted.
    pub fn size(&self) -> usize {
        self.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Value of the head element.
    pub fn front(&self) -> Option<&str> {
        // SAFETY: nodes reachable from the queue live as long as this borrow
        // of `self`, and cannot be changed through it.
        self.head.map(|head| unsafe { &*head.as_ptr() }.value.as_str())
    }

    /// Value of the tail element.
    pub fn back(&self) -> Option<&str> {
        // SAFETY: as in `front`.
        self.tail.map(|tail| unsafe { &*tail.as_ptr() }.value.as_str())
    }

    /// Reverses the order of the elements in place.
    pub fn reverse(&mut self) {
        if self.size <= 1 {
            return;
        }

        let mut reversed: Link = None;
        let mut current = self.head;
        while let Some(node) = current {
            // SAFETY: every node on the chain is live and owned by the queue.
            unsafe {
                current = (*node.as_ptr()).next;
                (*node.as_ptr()).next = reversed;
            }
            reversed = Some(node);
        }
        self.tail = self.head;
        self.head = reversed;
    }

    /// Sorts the elements in ascending byte order, keeping equal values in
    /// their current relative order.
    pub fn sort(&mut self) {
        if self.size <= 1 {
            return;
        }

        // SAFETY: the chain from `head` holds exactly `size` nodes, all owned
        // by the queue, and `&mut self` rules out any other access.
        unsafe {
            self.head = merge_sort(self.head, self.size);

            let mut last = self.head;
            for _ in 1..self.size {
                last = last.and_then(|node| (*node.as_ptr()).next);
            }
            self.tail = last;
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head,
            remaining: self.size,
            marker: PhantomData,
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.size == 0, self.head.is_none());
        assert_eq!(self.size == 0, self.tail.is_none());

        let mut count = 0;
        let mut last: Link = None;
        let mut cursor = self.head;
        while let Some(node) = cursor {
            count += 1;
            assert!(count <= self.size, "chain is longer than size");
            last = Some(node);
            cursor = unsafe { (*node.as_ptr()).next };
        }
        assert_eq!(count, self.size);
        assert_eq!(self.tail, last);
    }
}

impl Default for Queue {
    fn default() -> Queue {
        Queue::new()
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Borrowing iterator over the values of a [`Queue`], head first.
pub struct Iter<'a> {
    next: Link,
    remaining: usize,
    marker: PhantomData<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let node = self.next?;
        // SAFETY: the queue this iterator borrows keeps its nodes alive and
        // unchanged for `'a`.
        let node: &'a Element = unsafe { &*node.as_ptr() };
        self.next = node.next;
        self.remaining -= 1;
        Some(node.value.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
