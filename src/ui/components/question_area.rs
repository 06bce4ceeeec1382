use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::drill::{DrillState, Feedback};
use crate::ui::theme::Theme;

pub struct QuestionArea<'a, K> {
    pub drill: &'a DrillState<K>,
    pub prompt: String,
    pub skill_label: &'a str,
    pub target_ms: u64,
    pub theme: &'a Theme,
}

impl<'a, K> QuestionArea<'a, K> {
    pub fn new(
        drill: &'a DrillState<K>,
        prompt: String,
        skill_label: &'a str,
        target_ms: u64,
        theme: &'a Theme,
    ) -> Self {
        Self {
            drill,
            prompt,
            skill_label,
            target_ms,
            theme,
        }
    }

    fn feedback_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        match &self.drill.feedback {
            None => Line::from(""),
            Some(Feedback::Correct) => Line::from(Span::styled(
                "Correct!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            Some(Feedback::Incorrect { expected }) => Line::from(vec![
                Span::styled(
                    "Not quite. ",
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("The answer is {expected}. Press Enter to continue."),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Some(Feedback::TimedOut { expected }) => Line::from(vec![
                Span::styled(
                    "Time's up. ",
                    Style::default()
                        .fg(colors.warning())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("The answer was {expected}."),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Some(Feedback::Rejected(err)) => Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(colors.warning()),
            )),
        }
    }
}

impl<K> Widget for QuestionArea<'_, K> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let drill = self.drill;

        let title = format!(
            " Question {} of {} ",
            drill.current_index, drill.question_count
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let meta = format!(
            "{} | level {} | target {:.1}s",
            self.skill_label,
            drill.question.level,
            self.target_ms as f64 / 1000.0
        );
        Paragraph::new(Line::from(Span::styled(
            meta,
            Style::default().fg(colors.text_dim()),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        // Vertically center the prompt in its row.
        let prompt_area = layout[1];
        let prompt_y = prompt_area.y + prompt_area.height / 2;
        Paragraph::new(Line::from(Span::styled(
            self.prompt.as_str(),
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(Rect::new(prompt_area.x, prompt_y, prompt_area.width, 1), buf);

        let input_width = 20.min(layout[2].width);
        let input_area = Rect::new(
            layout[2].x + (layout[2].width - input_width) / 2,
            layout[2].y,
            input_width,
            layout[2].height,
        );
        let border = if drill.is_awaiting() {
            colors.accent()
        } else {
            colors.accent_dim()
        };
        let input_block = Block::bordered().border_style(Style::default().fg(border));
        let cursor = if drill.is_awaiting() { "_" } else { "" };
        Paragraph::new(Line::from(vec![
            Span::styled(drill.answer_text.as_str(), Style::default().fg(colors.highlight())),
            Span::styled(cursor, Style::default().fg(colors.text_dim())),
        ]))
        .alignment(Alignment::Center)
        .block(input_block)
        .render(input_area, buf);

        Paragraph::new(self.feedback_line())
            .alignment(Alignment::Center)
            .render(layout[4], buf);
    }
}
