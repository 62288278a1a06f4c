use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;

/// Moves `value` into a fresh heap box, returning it back inside `Err` when
/// the global allocator has no memory left instead of aborting the process.
pub(crate) fn try_box<T>(value: T) -> Result<Box<T>, T> {
    if injected_failure() {
        return Err(value);
    }
    if mem::size_of::<T>() == 0 {
        return Ok(Box::new(value));
    }

    let layout = Layout::new::<T>();
    // SAFETY: the layout has a non-zero size.
    let raw = unsafe { alloc::alloc(layout) } as *mut T;
    match NonNull::new(raw) {
        Some(ptr) => unsafe {
            // SAFETY: `ptr` was just allocated with the layout of `T` by the
            // global allocator, which is what `Box` expects to free it with.
            ptr.as_ptr().write(value);
            Ok(Box::from_raw(ptr.as_ptr()))
        },
        None => Err(value),
    }
}

/// Copies `text` into a string of its own, or `None` if the bytes could not
/// be reserved.
pub(crate) fn try_copy(text: &str) -> Option<String> {
    let mut value = String::new();
    if injected_failure() || value.try_reserve_exact(text.len()).is_err() {
        return None;
    }
    value.push_str(text);
    Some(value)
}

#[cfg(not(test))]
fn injected_failure() -> bool {
    false
}

#[cfg(test)]
fn injected_failure() -> bool {
    faults::should_fail()
}

/// Allocation failures on demand, per test thread.
#[cfg(test)]
pub(crate) mod faults {
    use std::cell::Cell;

    thread_local! {
        static REMAINING: Cell<Option<usize>> = Cell::new(None);
    }

    /// Disarms on drop.
    pub(crate) struct Armed(());

    impl Drop for Armed {
        fn drop(&mut self) {
            REMAINING.with(|remaining| remaining.set(None));
        }
    }

    /// Lets `successes` allocations on this thread through, then fails every
    /// one after them until the returned guard is dropped.
    pub(crate) fn fail_after(successes: usize) -> Armed {
        REMAINING.with(|remaining| remaining.set(Some(successes)));
        Armed(())
    }

    pub(super) fn should_fail() -> bool {
        REMAINING.with(|remaining| match remaining.get() {
            None => false,
            Some(0) => true,
            Some(n) => {
                remaining.set(Some(n - 1));
                false
            }
        })
    }
}
