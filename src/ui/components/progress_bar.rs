use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Bordered horizontal bar. Used for the per-question countdown.
pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub text: String,
    pub theme: &'a Theme,
    pub fill: Option<Color>,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, ratio: f64, theme: &'a Theme) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        Self {
            label: label.to_string(),
            ratio,
            text: format!("{:.0}%", ratio * 100.0),
            theme,
            fill: None,
        }
    }

    /// Countdown flavour: the label is the seconds left and the bar turns
    /// warning/error colored as time runs out.
    pub fn countdown(time_left: u32, limit: u32, theme: &'a Theme) -> Self {
        let ratio = if limit == 0 {
            0.0
        } else {
            time_left as f64 / limit as f64
        };
        let colors = &theme.colors;
        let fill = if ratio <= 0.25 {
            colors.error()
        } else if ratio <= 0.5 {
            colors.warning()
        } else {
            colors.bar_filled()
        };
        Self {
            text: format!("{time_left}s"),
            fill: Some(fill),
            ..Self::new("Time", ratio, theme)
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64) as u16;
        let fill = self.fill.unwrap_or_else(|| colors.bar_filled());

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(self.text.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &self.text, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_colors_by_remaining_share() {
        let theme = Theme::default();
        let colors = &theme.colors;
        assert_eq!(ProgressBar::countdown(15, 15, &theme).fill, Some(colors.bar_filled()));
        assert_eq!(ProgressBar::countdown(6, 15, &theme).fill, Some(colors.warning()));
        assert_eq!(ProgressBar::countdown(2, 15, &theme).fill, Some(colors.error()));
        assert_eq!(ProgressBar::countdown(3, 0, &theme).ratio, 0.0);
    }

    #[test]
    fn test_render_writes_label() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::countdown(7, 10, &theme).render(area, &mut buf);
        let row: String = (0..20).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("7s"));
    }
}
