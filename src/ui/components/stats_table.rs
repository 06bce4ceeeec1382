use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::SessionSummary;
use crate::ui::theme::Theme;

/// One precomputed row of the per-skill table.
pub struct SkillRow {
    pub label: &'static str,
    pub level: u32,
    pub max_level: u32,
    pub accuracy: f64,
    pub average_ms: f64,
    pub target_ms: u64,
    pub answered: usize,
    pub weakest: bool,
}

pub struct StatsTable<'a> {
    pub rows: Vec<SkillRow>,
    pub recent: Vec<&'a SessionSummary>,
    pub theme: &'a Theme,
}

impl<'a> StatsTable<'a> {
    pub fn new(rows: Vec<SkillRow>, recent: Vec<&'a SessionSummary>, theme: &'a Theme) -> Self {
        Self {
            rows,
            recent,
            theme,
        }
    }
}

fn format_seconds(ms: f64) -> String {
    if ms <= 0.0 {
        "-".to_string()
    } else {
        format!("{:.1}s", ms / 1000.0)
    }
}

impl Widget for StatsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Statistics ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.rows.len() as u16 + 3),
                Constraint::Min(0),
            ])
            .split(inner);

        let header_style = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "  {:<16}{:>7}{:>10}{:>10}{:>10}{:>8}",
                    "Skill", "Level", "Accuracy", "Average", "Target", "Seen"
                ),
                header_style,
            )),
            Line::from(""),
        ];

        for row in &self.rows {
            let acc_color = if row.answered == 0 {
                colors.text_dim()
            } else if row.accuracy >= 0.9 {
                colors.success()
            } else if row.accuracy >= 0.7 {
                colors.warning()
            } else {
                colors.error()
            };
            let marker = if row.weakest { "* " } else { "  " };
            let accuracy = if row.answered == 0 {
                "-".to_string()
            } else {
                format!("{:.0}%", row.accuracy * 100.0)
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{marker}{:<16}", row.label),
                    Style::default().fg(if row.weakest {
                        colors.highlight()
                    } else {
                        colors.fg()
                    }),
                ),
                Span::styled(
                    format!("{:>7}", format!("{}/{}", row.level, row.max_level)),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(format!("{accuracy:>10}"), Style::default().fg(acc_color)),
                Span::styled(
                    format!("{:>10}", format_seconds(row.average_ms)),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("{:>10}", format_seconds(row.target_ms as f64)),
                    Style::default().fg(colors.text_dim()),
                ),
                Span::styled(
                    format!("{:>8}", row.answered),
                    Style::default().fg(colors.text_dim()),
                ),
            ]));
        }
        Paragraph::new(lines).render(layout[0], buf);

        let mut recent_lines = vec![Line::from(Span::styled("  Recent sessions", header_style))];
        if self.recent.is_empty() {
            recent_lines.push(Line::from(Span::styled(
                "  No sessions finished yet",
                Style::default().fg(colors.text_dim()),
            )));
        }
        for summary in &self.recent {
            recent_lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} ", summary.finished_at.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(colors.text_dim()),
                ),
                Span::styled(
                    format!("{:<16}", summary.mode),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("{:>4}%  {}/{}", summary.accuracy_pct, summary.correct, summary.total()),
                    Style::default().fg(colors.fg()),
                ),
            ]));
        }
        Paragraph::new(recent_lines).render(layout[1], buf);
    }
}
