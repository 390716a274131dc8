/// First visible row index for a scrolling list. The selection is kept
/// roughly centered in the window, clamped at both ends.
pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    let max_offset = total_rows - max_visible_rows;
    let centered = selected_index.saturating_sub(max_visible_rows / 2);
    if centered > max_offset {
        max_offset
    } else {
        centered
    }
}

#[cfg(test)]
mod tests {
    use super::scroll_offset;

    #[test]
    fn short_lists_never_scroll() {
        assert_eq!(scroll_offset(3, 10, 2), 0);
        assert_eq!(scroll_offset(10, 10, 9), 0);
    }

    #[test]
    fn selection_stays_centered_in_long_lists() {
        assert_eq!(scroll_offset(20, 5, 0), 0);
        assert_eq!(scroll_offset(20, 5, 10), 8);
    }

    #[test]
    fn offset_clamps_at_the_end_of_the_list() {
        assert_eq!(scroll_offset(20, 5, 19), 15);
        assert_eq!(scroll_offset(20, 5, 17), 15);
    }
}
