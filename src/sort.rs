use crate::element::Link;

/// Sorts a chain of exactly `len` nodes in ascending byte order.
///
/// Equal payloads keep their relative order. Nodes are relinked in place;
/// no element or payload is allocated or freed.
///
/// # Safety
/// `chain` must be the head of a chain of at least `len` live nodes that the
/// caller owns and that nothing else is accessing.
pub(crate) unsafe fn merge_sort(chain: Link, len: usize) -> Link {
    if len <= 1 {
        return chain;
    }

    let half = len / 2;
    let back = split_off(chain, half);
    let front = merge_sort(chain, half);
    let back = merge_sort(back, len - half);
    merge(front, back)
}

/// Cuts the chain after its first `at` nodes and returns the rest.
unsafe fn split_off(chain: Link, at: usize) -> Link {
    let mut last = chain?;
    for _ in 1..at {
        last = (*last.as_ptr()).next?;
    }
    (*last.as_ptr()).next.take()
}

/// Consumes two sorted chains and links them into one sorted chain.
unsafe fn merge(mut front: Link, mut back: Link) -> Link {
    let mut merged: Link = None;
    let mut tail: Link = None;

    while let (Some(f), Some(b)) = (front, back) {
        // `<=` keeps the front node first on ties, which is what makes the
        // sort stable.
        let node = if (*f.as_ptr()).value.as_bytes() <= (*b.as_ptr()).value.as_bytes() {
            front = (*f.as_ptr()).next;
            f
        } else {
            back = (*b.as_ptr()).next;
            b
        };
        match tail {
            None => merged = Some(node),
            Some(tail) => (*tail.as_ptr()).next = Some(node),
        }
        tail = Some(node);
    }

    let rest = if front.is_some() { front } else { back };
    match tail {
        None => rest,
        Some(tail) => {
            (*tail.as_ptr()).next = rest;
            merged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn chain(values: &[&str]) -> Link {
        let mut head: Link = None;
        for value in values.iter().rev() {
            let node = Element::try_leaked(value).unwrap();
            unsafe { (*node.as_ptr()).next = head };
            head = Some(node);
        }
        head
    }

    /// Frees the chain, returning its values in order.
    fn take_values(mut chain: Link) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(node) = chain {
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            chain = node.next;
            out.push(node.value);
        }
        out
    }

    #[test]
    fn split_detaches_back_half() {
        let front = chain(&["a", "b", "c", "d", "e"]);
        let back = unsafe { split_off(front, 2) };
        assert_eq!(take_values(front), ["a", "b"]);
        assert_eq!(take_values(back), ["c", "d", "e"]);
    }

    #[test]
    fn merge_interleaves() {
        let merged = unsafe { merge(chain(&["a", "c", "e"]), chain(&["b", "d"])) };
        assert_eq!(take_values(merged), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn merge_with_empty_side() {
        assert_eq!(take_values(unsafe { merge(None, chain(&["x"])) }), ["x"]);
        assert_eq!(take_values(unsafe { merge(chain(&["y"]), None) }), ["y"]);
        assert!(unsafe { merge(None, None) }.is_none());
    }

    #[test]
    fn sorts_odd_and_even_lengths() {
        let sorted = unsafe { merge_sort(chain(&["d", "a", "c", "b"]), 4) };
        assert_eq!(take_values(sorted), ["a", "b", "c", "d"]);

        let sorted = unsafe { merge_sort(chain(&["pear", "fig", "apple", "kiwi", "date"]), 5) };
        assert_eq!(take_values(sorted), ["apple", "date", "fig", "kiwi", "pear"]);
    }

    #[test]
    fn compares_bytes_not_case_folded() {
        let sorted = unsafe { merge_sort(chain(&["b", "B", "a", "A", ""]), 5) };
        assert_eq!(take_values(sorted), ["", "A", "B", "a", "b"]);
    }

    #[test]
    fn prefix_sorts_first() {
        let sorted = unsafe { merge_sort(chain(&["abc", "ab", "abcd", "a"]), 4) };
        assert_eq!(take_values(sorted), ["a", "ab", "abc", "abcd"]);
    }
}
