use std::ptr::NonNull;

use crate::alloc::{try_box, try_copy};
use crate::error::QueueError;

/// Owning link to the next node. Nodes are leaked boxes; whoever unlinks a
/// node turns it back into a `Box` with `Box::from_raw` to free it.
pub(crate) type Link = Option<NonNull<Element>>;

/// One node of the chain: an owned copy of the caller's text and the link
/// to the node after it.
pub(crate) struct Element {
    pub(crate) value: String,
    pub(crate) next: Link,
}

impl Element {
    /// Copies `text` into a new, unlinked node.
    ///
    /// Nothing is allocated on the error path: a payload that was copied
    /// before the node allocation failed is released before returning.
    pub(crate) fn try_boxed(text: &str) -> Result<Box<Element>, QueueError> {
        let value = try_copy(text).ok_or_else(|| {
            tracing::warn!(len = text.len(), "payload allocation failed");
            QueueError::PayloadAlloc { len: text.len() }
        })?;

        try_box(Element { value, next: None }).map_err(|_| {
            tracing::warn!(len = text.len(), "element allocation failed");
            QueueError::NodeAlloc
        })
    }

    /// Same as [`Element::try_boxed`], handing the node over as a raw link.
    pub(crate) fn try_leaked(text: &str) -> Result<NonNull<Element>, QueueError> {
        Element::try_boxed(text).map(|node| NonNull::from(Box::leak(node)))
    }
}
