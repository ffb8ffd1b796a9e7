use std::ops::Range;

/// Split `[start, stop)` at single-byte separator positions.
///
/// Returns the non-empty ranges strictly between consecutive separators. Indices
/// must be ascending and lie within `[start, stop)`.
pub fn split_at(indices: &[usize], start: usize, stop: usize) -> Vec<Range<usize>> {
    debug_assert!(
        indices.iter().all(|idx| (start..stop).contains(idx)),
        "split indices {indices:?} outside {start}..{stop}"
    );
    let mut ranges = Vec::with_capacity(indices.len() + 1);
    let mut current = start;
    for &idx in indices {
        if idx > current {
            ranges.push(current..idx);
        } else {
            debug_assert_eq!(idx, current, "split indices must be ascending");
        }
        current = idx + 1;
    }
    if current < stop {
        ranges.push(current..stop);
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_indices_is_whole_window() {
        assert_eq!(split_at(&[], 2, 6), vec![2..6]);
    }

    #[test]
    fn splits_between_separators() {
        // "int, str, bool"
        assert_eq!(split_at(&[3, 8], 0, 14), vec![0..3, 4..8, 9..14]);
    }

    #[test]
    fn adjacent_separators_skip_empty_range() {
        assert_eq!(split_at(&[1, 2], 0, 4), vec![0..1, 3..4]);
    }

    #[test]
    fn leading_and_trailing_separators() {
        assert_eq!(split_at(&[0, 3], 0, 4), vec![1..3]);
    }
}
