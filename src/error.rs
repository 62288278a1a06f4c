use thiserror::Error;

/// Errors reported by the fallible queue operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum QueueError {
    /// No memory for a new element node.
    #[error("could not allocate an element node")]
    NodeAlloc,
    /// No memory for the payload copy.
    #[error("could not allocate {len} bytes for the element payload")]
    PayloadAlloc { len: usize },
    /// No memory for the queue itself.
    #[error("could not allocate the queue")]
    QueueAlloc,
    /// Removal from a queue with no elements.
    #[error("queue is empty")]
    Empty,
}
