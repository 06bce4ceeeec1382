use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Header, body and footer rows shared by every screen.
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Greedily packs key hints into as few lines of `width` columns as possible.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_respects_minimum_and_bounds() {
        let area = Rect::new(0, 0, 120, 40);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, Rect::new(30, 10, 60, 20));

        let small = Rect::new(0, 0, 30, 10);
        assert_eq!(centered_rect(50, 50, small), small);
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let hints = ["[Enter] Submit", "[Esc] Menu", "[Backspace] Delete"];
        assert_eq!(
            pack_hint_lines(&hints, 80),
            vec![" [Enter] Submit  [Esc] Menu  [Backspace] Delete".to_string()]
        );
        let narrow = pack_hint_lines(&hints, 30);
        assert_eq!(narrow.len(), 2);
        assert!(narrow.iter().all(|line| line.chars().count() <= 30));
        assert!(pack_hint_lines(&hints, 0).is_empty());
    }

    #[test]
    fn test_app_layout_rows() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.height, 1);
        assert_eq!(layout.main.height, 22);
    }
}
