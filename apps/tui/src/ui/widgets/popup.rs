use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::Widget;

/// Viewport margin the tooltip box never crosses.
const TOOLTIP_MARGIN: u16 = 1;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
            ratatui::layout::Constraint::Percentage(percent_y),
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
            ratatui::layout::Constraint::Percentage(percent_x),
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

/// Where the tooltip overlay ended up relative to its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipPlacement {
    pub rect: Rect,
    /// Column inside the box aligned with the trigger's center.
    pub pointer_col: u16,
    pub above: bool,
}

/// Places the tooltip box next to its trigger row.
///
/// Above is preferred; the box flips below only when the space above
/// cannot hold it AND the space below is at least as large. Both axes
/// are clamped to the viewport minus a fixed margin, and the pointer
/// column is clamped to the box interior.
pub fn tooltip_placement(trigger: Rect, width: u16, height: u16, viewport: Rect) -> TooltipPlacement {
    let width = width
        .min(viewport.width.saturating_sub(2 * TOOLTIP_MARGIN))
        .max(3);
    let height = height
        .min(viewport.height.saturating_sub(2 * TOOLTIP_MARGIN))
        .max(1);

    let top_bound = viewport.y + TOOLTIP_MARGIN;
    let bottom_bound = (viewport.y + viewport.height).saturating_sub(TOOLTIP_MARGIN);

    let space_above = trigger.y.saturating_sub(top_bound);
    let space_below = bottom_bound.saturating_sub(trigger.y + trigger.height);

    let above = !(space_above < height && space_below >= space_above);

    let y = if above {
        trigger.y.saturating_sub(height).max(top_bound)
    } else {
        let y = trigger.y + trigger.height;
        if y + height > bottom_bound {
            bottom_bound.saturating_sub(height).max(top_bound)
        } else {
            y
        }
    };

    let trigger_center = trigger.x + trigger.width / 2;
    let min_x = viewport.x + TOOLTIP_MARGIN;
    let max_x = (viewport.x + viewport.width)
        .saturating_sub(TOOLTIP_MARGIN + width)
        .max(min_x);
    let x = trigger_center.saturating_sub(width / 2).clamp(min_x, max_x);

    let pointer_col = trigger_center
        .saturating_sub(x)
        .clamp(1, width.saturating_sub(2).max(1));

    TooltipPlacement {
        rect: Rect {
            x,
            y,
            width,
            height,
        },
        pointer_col,
        above,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };

    const fn row(x: u16, y: u16, width: u16) -> Rect {
        Rect {
            x,
            y,
            width,
            height: 1,
        }
    }

    #[test]
    fn prefers_the_space_above_the_trigger() {
        let placement = tooltip_placement(row(30, 10, 20), 20, 5, VIEWPORT);

        assert!(placement.above);
        assert_eq!(placement.rect, Rect { x: 30, y: 5, width: 20, height: 5 });
        // Pointer sits under the trigger's center (col 40)
        assert_eq!(placement.pointer_col, 10);
    }

    #[test]
    fn flips_below_when_above_cannot_hold_it() {
        let placement = tooltip_placement(row(30, 2, 20), 20, 5, VIEWPORT);

        assert!(!placement.above);
        assert_eq!(placement.rect.y, 3);
    }

    #[test]
    fn stays_above_when_below_is_even_tighter() {
        // Trigger near the bottom: neither side fits fully, but above
        // has more room, so the box stays above and clamps.
        let placement = tooltip_placement(row(30, 21, 20), 20, 30, VIEWPORT);

        assert!(placement.above);
        assert!(placement.rect.y >= 1);
        assert!(placement.rect.height <= VIEWPORT.height - 2);
    }

    #[test]
    fn clamps_to_the_left_viewport_edge() {
        let placement = tooltip_placement(row(0, 10, 4), 20, 5, VIEWPORT);

        assert_eq!(placement.rect.x, 1);
        // Pointer still aims at the trigger center, clamped inside
        assert_eq!(placement.pointer_col, 1);
    }

    #[test]
    fn clamps_to_the_right_viewport_edge() {
        let placement = tooltip_placement(row(70, 10, 8), 30, 5, VIEWPORT);

        assert_eq!(placement.rect.x + placement.rect.width, 79);
        assert!(placement.pointer_col < placement.rect.width - 1);
    }

    #[test]
    fn oversized_box_shrinks_to_the_viewport() {
        let placement = tooltip_placement(row(10, 10, 10), 200, 50, VIEWPORT);

        assert!(placement.rect.width <= VIEWPORT.width - 2);
        assert!(placement.rect.height <= VIEWPORT.height - 2);
    }
}
