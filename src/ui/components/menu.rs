use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::stats::SkillKey;
use crate::session::mode::Mode;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction<K> {
    Start(Mode<K>),
    Stats,
    Settings,
}

pub struct MenuItem<K> {
    pub key: char,
    pub label: String,
    pub description: String,
    pub action: MenuAction<K>,
}

pub struct Menu<'a, K> {
    pub items: Vec<MenuItem<K>>,
    pub selected: usize,
    pub theme: &'a Theme,
    /// Shown under the title, e.g. the weakest skill.
    pub hint: Option<String>,
}

impl<'a, K: SkillKey> Menu<'a, K> {
    pub fn new(theme: &'a Theme) -> Self {
        let mut items = vec![MenuItem {
            key: '1',
            label: "Mixed Practice".to_string(),
            description: "Weaker skills come up more often".to_string(),
            action: MenuAction::Start(Mode::Mixed),
        }];
        for (skill, key) in K::all().iter().zip('2'..='9') {
            items.push(MenuItem {
                key,
                label: skill.label().to_string(),
                description: format!("Drill {} only", skill.label().to_lowercase()),
                action: MenuAction::Start(Mode::Skill(*skill)),
            });
        }
        items.push(MenuItem {
            key: 's',
            label: "Statistics".to_string(),
            description: "Levels, accuracy and recent sessions".to_string(),
            action: MenuAction::Stats,
        });
        items.push(MenuItem {
            key: 'c',
            label: "Settings".to_string(),
            description: "Question count, time limit, negatives".to_string(),
            action: MenuAction::Settings,
        });

        Self {
            items,
            selected: 0,
            theme,
            hint: None,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> Option<MenuAction<K>> {
        self.items.get(self.selected).map(|item| item.action)
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction<K>> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.action)
    }
}

impl<K> Widget for &Menu<'_, K> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let mut title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "mathdr",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Terminal Arithmetic Drill",
                Style::default().fg(colors.fg()),
            )),
        ];
        if let Some(hint) = &self.hint {
            title_lines.push(Line::from(Span::styled(
                hint.as_str(),
                Style::default().fg(colors.highlight()),
            )));
        }

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(2))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("       {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    &*label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(
                    &*desc_text,
                    Style::default().fg(colors.text_dim()),
                )),
            ];

            let p = Paragraph::new(lines);
            if i < menu_layout.len() {
                p.render(menu_layout[i], buf);
            }
        }
    }
}
