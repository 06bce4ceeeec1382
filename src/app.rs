use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::generator::arithmetic::MathSkill;
use crate::session::machine::{Screen, SessionEvent, SessionMachine};
use crate::session::mode::Mode;
use crate::settings::Settings;
use crate::store::json_store::JsonStore;
use crate::store::schema::SessionData;
use crate::subject::Subject;
use crate::subject::math::MathSubject;
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::theme::Theme;

/// Settings given on the command line. They win over the saved file for
/// this run and are only written back if the user edits settings.
#[derive(Clone, Debug, Default)]
pub struct SettingsOverride {
    pub question_count: Option<u32>,
    pub time_limit_seconds: Option<u32>,
}

impl SettingsOverride {
    fn apply(&self, settings: &mut Settings) {
        if let Some(count) = self.question_count {
            settings.question_count = count;
        }
        if let Some(limit) = self.time_limit_seconds {
            settings.time_limit_seconds = limit;
        }
    }
}

pub struct App {
    pub machine: SessionMachine<MathSubject>,
    pub menu: Menu<'static, MathSkill>,
    pub theme: &'static Theme,
    pub config: Config,
    pub store: Option<JsonStore>,
    pub settings_selected: usize,
    pub stats_confirm_reset: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, overrides: &SettingsOverride) -> Self {
        let store = match JsonStore::with_base_dir(config.data_dir()) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!(dir = %config.data_dir, error = %e, "data directory unavailable, progress will not be saved");
                None
            }
        };
        Self::with_store(config, store, overrides, SmallRng::from_entropy())
    }

    pub fn with_store(
        mut config: Config,
        store: Option<JsonStore>,
        overrides: &SettingsOverride,
        rng: SmallRng,
    ) -> Self {
        let loaded_theme = match Theme::load(&config.theme) {
            Some(theme) => theme,
            None => {
                tracing::warn!(theme = %config.theme, "unknown theme, using default");
                config.normalize_theme(&Theme::available_themes());
                Theme::load(&config.theme).unwrap_or_default()
            }
        };
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let (session, settings) = match &store {
            Some(store) => (store.load_session::<MathSkill>(), store.load_settings()),
            None => (None, None),
        };
        let mut settings = settings.unwrap_or_default();
        overrides.apply(&mut settings);

        let mut machine = SessionMachine::new(MathSubject::new(), Settings::default(), rng);
        let (stats, mode) = match session {
            Some(data) => (Some(data.stats), Some(data.mode)),
            None => (None, None),
        };
        machine.restore(stats, mode, Some(settings));

        let mut app = Self {
            machine,
            menu: Menu::new(theme),
            theme,
            config,
            store,
            settings_selected: 0,
            stats_confirm_reset: false,
            should_quit: false,
        };
        app.refresh_menu_hint();
        app
    }

    /// Fires due timers, then persists whatever changed.
    pub fn tick(&mut self, now: Instant) {
        self.machine.tick(now);
        self.flush_events();
    }

    pub fn start_session(&mut self, mode: Mode<MathSkill>, now: Instant) {
        self.machine.start_session(mode, now);
        self.flush_events();
    }

    pub fn activate(&mut self, action: MenuAction<MathSkill>, now: Instant) {
        match action {
            MenuAction::Start(mode) => self.start_session(mode, now),
            MenuAction::Stats => self.go_to_stats(),
            MenuAction::Settings => self.go_to_settings(),
        }
    }

    pub fn type_char(&mut self, ch: char) {
        self.machine.push_input(ch);
    }

    pub fn backspace(&mut self) {
        self.machine.pop_input();
    }

    pub fn clear_answer(&mut self) {
        self.machine.clear_input();
    }

    /// Enter in the drill: submit while awaiting, otherwise move on.
    pub fn confirm(&mut self, now: Instant) {
        let answered = self.machine.drill().is_some_and(|d| d.is_answered());
        if answered {
            self.machine.next_question(now);
        } else {
            self.machine.submit(now);
        }
        self.flush_events();
    }

    pub fn practice_again(&mut self, now: Instant) {
        self.machine.practice_again(now);
        self.flush_events();
    }

    pub fn go_to_menu(&mut self) {
        self.machine.return_to_menu();
        self.stats_confirm_reset = false;
        self.refresh_menu_hint();
        self.flush_events();
    }

    pub fn go_to_stats(&mut self) {
        self.stats_confirm_reset = false;
        self.machine.open_stats();
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.machine.open_settings();
    }

    pub fn reset_stats(&mut self) {
        self.machine.reset_stats();
        self.stats_confirm_reset = false;
        self.flush_events();
    }

    pub fn settings_select_next(&mut self) {
        let last = self.machine.controls().len().saturating_sub(1);
        self.settings_selected = (self.settings_selected + 1).min(last);
    }

    pub fn settings_select_prev(&mut self) {
        self.settings_selected = self.settings_selected.saturating_sub(1);
    }

    pub fn settings_adjust(&mut self, direction: i64) {
        self.machine.adjust_setting(self.settings_selected, direction);
        self.flush_events();
    }

    pub fn settings_reset(&mut self) {
        self.machine.reset_settings();
        self.flush_events();
    }

    pub fn screen(&self) -> Screen {
        self.machine.screen()
    }

    fn refresh_menu_hint(&mut self) {
        let stats = self.machine.stats();
        let practiced = stats.iter().any(|(_, s)| !s.history.is_empty());
        self.menu.hint = practiced.then(|| {
            let weakest = self.machine.weakest_skill();
            format!(
                "Weakest skill: {} (level {})",
                self.machine.subject().skill_label(weakest),
                stats.level(weakest)
            )
        });
    }

    fn flush_events(&mut self) {
        let mut session_dirty = false;
        let mut settings_dirty = false;
        for event in self.machine.drain_events() {
            match event {
                SessionEvent::StatsChanged => session_dirty = true,
                SessionEvent::SettingsChanged => settings_dirty = true,
                SessionEvent::SessionFinished(_) => self.refresh_menu_hint(),
                SessionEvent::QuestionShown { .. }
                | SessionEvent::AnswerRejected(_)
                | SessionEvent::Answered(_) => {}
            }
        }
        if session_dirty {
            self.save_session();
        }
        if settings_dirty {
            self.save_settings();
        }
    }

    fn save_session(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let data = SessionData {
            stats: self.machine.stats().clone(),
            mode: self.machine.mode(),
        };
        if let Err(e) = store.save_session(&data) {
            tracing::warn!(error = %e, "failed to save session");
        }
    }

    fn save_settings(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save_settings(self.machine.settings()) {
            tracing::warn!(error = %e, "failed to save settings");
        }
    }
}
