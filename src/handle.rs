//! Queue operations over a possibly absent queue.
//!
//! Drivers that hand queues around as nullable references go through these
//! functions: an absent queue turns every operation into `false`, `0` or a
//! no-op instead of a failure.

use crate::queue::Queue;

/// Allocates an empty queue, or `None` if no memory is available.
pub fn new() -> Option<Box<Queue>> {
    Queue::try_boxed().ok()
}

pub fn destroy(queue: Option<Box<Queue>>) {
    if let Some(queue) = queue {
        queue.destroy();
    }
}

pub fn insert_head(queue: Option<&mut Queue>, text: &str) -> bool {
    queue.map_or(false, |queue| queue.insert_head(text))
}

pub fn insert_tail(queue: Option<&mut Queue>, text: &str) -> bool {
    queue.map_or(false, |queue| queue.insert_tail(text))
}

/// See [`Queue::remove_head`] for how `out` is filled.
pub fn remove_head(queue: Option<&mut Queue>, out: Option<&mut [u8]>) -> bool {
    queue.map_or(false, |queue| queue.remove_head(out))
}

pub fn size(queue: Option<&Queue>) -> usize {
    queue.map_or(0, Queue::size)
}

pub fn reverse(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

pub fn sort(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_queue_degrades() {
        let mut buf = [9u8; 4];
        assert!(!insert_head(None, "a"));
        assert!(!insert_tail(None, "a"));
        assert!(!remove_head(None, Some(&mut buf[..])));
        assert_eq!(buf, [9u8; 4]);
        assert_eq!(size(None), 0);
        reverse(None);
        sort(None);
        destroy(None);
    }

    #[test]
    fn present_queue_is_driven() {
        let mut queue = new().unwrap();
        assert!(insert_tail(Some(&mut *queue), "b"));
        assert!(insert_head(Some(&mut *queue), "c"));
        assert!(insert_tail(Some(&mut *queue), "a"));
        assert_eq!(size(Some(&*queue)), 3);

        sort(Some(&mut *queue));
        reverse(Some(&mut *queue));

        let mut buf = [0u8; 8];
        assert!(remove_head(Some(&mut *queue), Some(&mut buf[..])));
        assert_eq!(&buf[..2], b"c\0");
        assert_eq!(size(Some(&*queue)), 2);
        queue.assert_invariants();

        destroy(Some(queue));
    }
}
