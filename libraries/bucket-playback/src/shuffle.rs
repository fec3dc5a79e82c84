//! Track navigation: next/previous index selection
//!
//! Neither direction wraps around. Shuffle picks uniformly over the whole
//! list, so it may land on the current track again.

use rand::Rng;

/// Index that `next` moves to, or `None` when it is a no-op.
///
/// With nothing selected there is nothing to advance from.
pub fn next_index<R: Rng + ?Sized>(
    current: Option<usize>,
    len: usize,
    shuffle: bool,
    rng: &mut R,
) -> Option<usize> {
    let current = current?;
    if len == 0 {
        return None;
    }

    if shuffle {
        Some(rng.gen_range(0..len))
    } else if current + 1 < len {
        Some(current + 1)
    } else {
        None
    }
}

/// Index that `previous` moves to, or `None` at the start of the list.
pub fn previous_index(current: Option<usize>) -> Option<usize> {
    current.and_then(|index| index.checked_sub(1))
}
