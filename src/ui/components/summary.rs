use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::SessionSummary;
use crate::ui::theme::Theme;

/// End-of-session results card.
pub struct Summary<'a> {
    pub summary: &'a SessionSummary,
    pub theme: &'a Theme,
}

impl<'a> Summary<'a> {
    pub fn new(summary: &'a SessionSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let s = self.summary;

        let block = Block::bordered()
            .title(" Session Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "Results",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", s.mode),
                Style::default().fg(colors.text_dim()),
            ),
        ]))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let acc_color = if s.accuracy_pct >= 90 {
            colors.success()
        } else if s.accuracy_pct >= 70 {
            colors.warning()
        } else {
            colors.error()
        };
        let acc_line = Line::from(vec![
            Span::styled("  Accuracy: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}%", s.accuracy_pct),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({}/{} correct)", s.correct, s.total()),
                Style::default().fg(colors.text_dim()),
            ),
        ]);
        Paragraph::new(acc_line).render(layout[1], buf);

        let wrong_line = Line::from(vec![
            Span::styled("  Wrong:    ", Style::default().fg(colors.fg())),
            Span::styled(
                s.wrong.to_string(),
                Style::default().fg(if s.wrong == 0 {
                    colors.success()
                } else {
                    colors.error()
                }),
            ),
            Span::styled(
                format!("  ({} timed out)", s.timed_out),
                Style::default().fg(colors.text_dim()),
            ),
        ]);
        Paragraph::new(wrong_line).render(layout[2], buf);

        let time_line = Line::from(vec![
            Span::styled("  Average:  ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{:.1}s", s.average_ms / 1000.0),
                Style::default().fg(colors.fg()),
            ),
        ]);
        Paragraph::new(time_line).render(layout[3], buf);

        let mut level_spans = vec![Span::styled("  Levels:   ", Style::default().fg(colors.fg()))];
        if s.promotions == 0 && s.demotions == 0 {
            level_spans.push(Span::styled("no change", Style::default().fg(colors.text_dim())));
        } else {
            level_spans.push(Span::styled(
                format!("+{}", s.promotions),
                Style::default().fg(colors.success()),
            ));
            level_spans.push(Span::styled(" / ", Style::default().fg(colors.text_dim())));
            level_spans.push(Span::styled(
                format!("-{}", s.demotions),
                Style::default().fg(colors.error()),
            ));
        }
        Paragraph::new(Line::from(level_spans)).render(layout[4], buf);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("  [r/Enter] Practice again  ", Style::default().fg(colors.accent())),
            Span::styled("[s] Stats  ", Style::default().fg(colors.accent())),
            Span::styled("[q] Menu", Style::default().fg(colors.accent())),
        ]));
        help.render(layout[6], buf);
    }
}
