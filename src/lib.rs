mod alloc;
mod element;
mod error;
pub mod handle;
mod queue;
mod sort;

pub use error::QueueError;
pub use queue::{Iter, Queue, Removal};

#[cfg(test)]
static SOME_ELEMS: usize = 10;
#[cfg(test)]
static MANY_ELEMS: usize = 100_000;
#[cfg(test)]
static NUM_THREADS: usize = 4;
#[cfg(test)]
static ELEMS_PER_THREAD: usize = MANY_ELEMS / NUM_THREADS;
