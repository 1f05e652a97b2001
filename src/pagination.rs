//! Windowed page strip for the pagination bar
//!
//! Mirrors the classic paginator shape: one page kept at each edge, a range
//! around the current page, and gaps collapsed into an ellipsis slot.

fn page_window(
    total_pages: u32,
    current_page: u32,
    left_edge: u32,
    left_current: u32,
    right_current: u32,
    right_edge: u32,
) -> Vec<Option<u32>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Page buttons to render for `current` out of `total_pages`; `None` marks a
/// collapsed gap
pub fn page_strip(current: u32, total_pages: u32) -> Vec<Option<u32>> {
    let current = current.max(1);
    page_window(total_pages, current, 1, 2, 2, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(current: u32, total: u32) -> Vec<Option<u32>> {
        page_strip(current, total)
    }

    #[test]
    fn empty_when_no_pages() {
        assert!(strip(1, 0).is_empty());
    }

    #[test]
    fn small_counts_have_no_gaps() {
        assert_eq!(strip(1, 1), vec![Some(1)]);
        assert_eq!(strip(2, 3), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(
            strip(1, 5),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
    }

    #[test]
    fn start_of_long_run_collapses_right() {
        assert_eq!(
            strip(1, 10),
            vec![Some(1), Some(2), Some(3), None, Some(10)]
        );
    }

    #[test]
    fn middle_of_long_run_collapses_both_sides() {
        assert_eq!(
            strip(5, 10),
            vec![
                Some(1),
                None,
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                None,
                Some(10)
            ]
        );
    }

    #[test]
    fn end_of_long_run_collapses_left() {
        assert_eq!(
            strip(10, 10),
            vec![Some(1), None, Some(8), Some(9), Some(10)]
        );
    }

    #[test]
    fn zero_current_is_clamped() {
        assert_eq!(strip(0, 3), vec![Some(1), Some(2), Some(3)]);
    }
}
