use std::collections::VecDeque;
use std::time::Instant;

use rand::rngs::SmallRng;

use crate::engine::leveling::LevelChange;
use crate::engine::stats::{AnswerResult, SkillKey, Stats};
use crate::generator::Question;
use crate::session::drill::{DrillState, Feedback, Verdict};
use crate::session::input;
use crate::session::mode::Mode;
use crate::session::result::{Outcome, SessionSummary};
use crate::session::timer::{AUTO_ADVANCE_DELAY, COUNTDOWN_TICK, TimerSlot, Timers};
use crate::settings::{self, SettingControl, Settings};
use crate::subject::Subject;
use crate::subject::answer::{AnswerContract, AnswerError};

/// How many finished sessions the stats screen remembers.
pub const RECENT_SUMMARIES: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Drill,
    Summary,
    Stats,
    Settings,
}

/// Things the presentation layer may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent<K> {
    QuestionShown { question_id: String, index: u32 },
    AnswerRejected(AnswerError),
    Answered(Outcome<K>),
    SessionFinished(SessionSummary),
    /// Stats or mode changed; the session blob should be saved.
    StatsChanged,
    SettingsChanged,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Submission<K> {
    /// Not awaiting an answer; nothing happened.
    Ignored,
    Rejected(AnswerError),
    Scored(Outcome<K>),
}

/// Screen flow and per-question timing for one drill subject.
///
/// Time never comes from the wall clock here: every time-aware call takes
/// `now`, and [`SessionMachine::tick`] fires whatever timers are due.
pub struct SessionMachine<S: Subject> {
    subject: S,
    defaults: Settings,
    settings: Settings,
    controls: Vec<SettingControl>,
    stats: Stats<S::Skill>,
    mode: Mode<S::Skill>,
    screen: Screen,
    drill: Option<DrillState<S::Skill>>,
    timers: Timers,
    last_summary: Option<SessionSummary>,
    recent: VecDeque<SessionSummary>,
    events: Vec<SessionEvent<S::Skill>>,
    rng: SmallRng,
}

impl<S: Subject> SessionMachine<S> {
    pub fn new(subject: S, defaults: Settings, rng: SmallRng) -> Self {
        let controls = subject.setting_controls();
        let mut defaults = defaults;
        settings::normalize(&mut defaults, &controls);
        let stats = subject.default_stats();
        Self {
            subject,
            settings: defaults.clone(),
            defaults,
            controls,
            stats,
            mode: Mode::Mixed,
            screen: Screen::Menu,
            drill: None,
            timers: Timers::default(),
            last_summary: None,
            recent: VecDeque::new(),
            events: Vec::new(),
            rng,
        }
    }

    /// Loads persisted state. Anything missing falls back to defaults and
    /// everything is re-clamped.
    pub fn restore(
        &mut self,
        stats: Option<Stats<S::Skill>>,
        mode: Option<Mode<S::Skill>>,
        settings: Option<Settings>,
    ) {
        self.stats = stats
            .unwrap_or_else(|| self.subject.default_stats())
            .normalized(self.subject.max_level());
        if let Some(mode) = mode {
            self.mode = mode;
        }
        let mut settings = settings.unwrap_or_else(|| self.defaults.clone());
        settings::normalize(&mut settings, &self.controls);
        self.settings = settings;
    }

    pub fn subject(&self) -> &S {
        &self.subject
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn controls(&self) -> &[SettingControl] {
        &self.controls
    }

    pub fn stats(&self) -> &Stats<S::Skill> {
        &self.stats
    }

    pub fn mode(&self) -> Mode<S::Skill> {
        self.mode
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn drill(&self) -> Option<&DrillState<S::Skill>> {
        self.drill.as_ref()
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    /// Newest first.
    pub fn recent_summaries(&self) -> impl Iterator<Item = &SessionSummary> {
        self.recent.iter()
    }

    pub fn weakest_skill(&self) -> S::Skill {
        self.subject.weakest_skill(&self.stats)
    }

    pub fn answer_contract(&self) -> S::Answer {
        self.subject.answer_contract(&self.settings)
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent<S::Skill>> {
        std::mem::take(&mut self.events)
    }

    pub fn start_session(&mut self, mode: Mode<S::Skill>, now: Instant) {
        self.timers.cancel_all();
        self.mode = mode;
        let question = self.draw_question();
        let drill = DrillState::new(
            question,
            self.settings.question_count,
            self.settings.time_limit_seconds,
            now,
        );
        tracing::info!(
            mode = mode.key(),
            questions = drill.question_count,
            time_limit = drill.time_limit_seconds,
            "session started"
        );
        self.drill = Some(drill);
        self.screen = Screen::Drill;
        self.show_current(now);
        self.events.push(SessionEvent::StatsChanged);
    }

    /// Runs the same mode again from the summary screen.
    pub fn practice_again(&mut self, now: Instant) -> bool {
        if self.screen != Screen::Summary {
            return false;
        }
        self.start_session(self.mode, now);
        true
    }

    pub fn push_input(&mut self, ch: char) -> bool {
        if self.screen != Screen::Drill {
            return false;
        }
        let contract = self.subject.answer_contract(&self.settings);
        let Some(drill) = self.drill.as_mut() else {
            return false;
        };
        let accepted = input::process_char(drill, &contract, ch);
        if accepted && matches!(drill.feedback, Some(Feedback::Rejected(_))) {
            drill.feedback = None;
        }
        accepted
    }

    pub fn pop_input(&mut self) {
        if let Some(drill) = self.drill.as_mut() {
            input::process_backspace(drill);
        }
    }

    pub fn clear_input(&mut self) {
        if let Some(drill) = self.drill.as_mut() {
            input::clear(drill);
        }
    }

    /// Replaces the answer text and submits it.
    pub fn submit_text(&mut self, raw: &str, now: Instant) -> Submission<S::Skill> {
        if let Some(drill) = self.drill.as_mut().filter(|d| d.is_awaiting()) {
            drill.answer_text = raw.to_string();
        }
        self.submit(now)
    }

    /// Scores the current answer text. Rejected input leaves the question
    /// and its countdown untouched.
    pub fn submit(&mut self, now: Instant) -> Submission<S::Skill> {
        // A countdown that already ran out wins over a late submission.
        self.run_countdown(now);
        if self.screen != Screen::Drill {
            return Submission::Ignored;
        }
        let contract = self.subject.answer_contract(&self.settings);
        let Some(drill) = self.drill.as_mut() else {
            return Submission::Ignored;
        };
        if !drill.is_awaiting() {
            return Submission::Ignored;
        }

        match contract.read(&drill.answer_text) {
            Err(err) => {
                tracing::debug!(input = %drill.answer_text, error = ?err, "answer rejected");
                drill.feedback = Some(Feedback::Rejected(err));
                self.events.push(SessionEvent::AnswerRejected(err));
                Submission::Rejected(err)
            }
            Ok(value) => {
                let verdict = if contract.is_correct(&drill.question, value) {
                    Verdict::Correct
                } else {
                    Verdict::Incorrect
                };
                let elapsed_ms = drill.elapsed_ms(now);
                match self.score(verdict, elapsed_ms, now) {
                    Some(outcome) => Submission::Scored(outcome),
                    None => Submission::Ignored,
                }
            }
        }
    }

    /// Fires due timers: countdown ticks (timing out at zero) and the
    /// delayed advance after a correct answer or a timeout.
    pub fn tick(&mut self, now: Instant) {
        self.run_countdown(now);

        if let Some(armed) = self.timers.take_due(TimerSlot::AutoAdvance, now) {
            let current = self
                .drill
                .as_ref()
                .is_some_and(|d| d.question.id == armed.question_id && d.is_answered());
            if current {
                self.advance(now);
            } else {
                tracing::trace!(question = %armed.question_id, "stale auto-advance ignored");
            }
        }
    }

    fn run_countdown(&mut self, now: Instant) {
        while let Some(armed) = self.timers.take_due(TimerSlot::Countdown, now) {
            let Some(drill) = self.drill.as_mut() else {
                break;
            };
            if drill.question.id != armed.question_id || !drill.is_awaiting() {
                tracing::trace!(question = %armed.question_id, "stale countdown tick ignored");
                break;
            }
            drill.time_left_seconds = drill.time_left_seconds.saturating_sub(1);
            if drill.time_left_seconds == 0 {
                let elapsed_ms = drill.time_limit_seconds as u64 * 1000;
                self.score(Verdict::TimedOut, elapsed_ms, armed.deadline);
                break;
            }
            self.timers.arm(
                TimerSlot::Countdown,
                &armed.question_id,
                armed.deadline + COUNTDOWN_TICK,
            );
        }
    }

    /// Moves past an answered question. Wrong answers only move on this way.
    pub fn next_question(&mut self, now: Instant) -> bool {
        if self.screen != Screen::Drill {
            return false;
        }
        if !self.drill.as_ref().is_some_and(|d| d.is_answered()) {
            return false;
        }
        self.advance(now);
        true
    }

    pub fn return_to_menu(&mut self) {
        self.timers.cancel_all();
        if let Some(drill) = self.drill.take() {
            tracing::info!(
                index = drill.current_index,
                of = drill.question_count,
                "session abandoned"
            );
        }
        self.screen = Screen::Menu;
    }

    pub fn open_stats(&mut self) -> bool {
        self.open_side_screen(Screen::Stats)
    }

    pub fn open_settings(&mut self) -> bool {
        self.open_side_screen(Screen::Settings)
    }

    fn open_side_screen(&mut self, screen: Screen) -> bool {
        if self.screen == Screen::Drill {
            return false;
        }
        self.screen = screen;
        true
    }

    /// Nudges setting `index` one step; `direction` is +1 or -1.
    pub fn adjust_setting(&mut self, index: usize, direction: i64) -> bool {
        if self.screen != Screen::Settings {
            return false;
        }
        let Some(control) = self.controls.get(index) else {
            return false;
        };
        let before = self.settings.clone();
        control.nudge(&mut self.settings, direction);
        if self.settings == before {
            return false;
        }
        tracing::debug!(setting = control.id, value = control.value(&self.settings), "setting changed");
        self.events.push(SessionEvent::SettingsChanged);
        true
    }

    pub fn reset_settings(&mut self) {
        if self.settings != self.defaults {
            self.settings = self.defaults.clone();
            self.events.push(SessionEvent::SettingsChanged);
        }
    }

    /// Forgets all levels and histories. Only from the stats screen.
    pub fn reset_stats(&mut self) -> bool {
        if self.screen != Screen::Stats {
            return false;
        }
        tracing::info!("stats reset");
        self.stats = self.subject.default_stats();
        self.events.push(SessionEvent::StatsChanged);
        true
    }

    fn draw_question(&mut self) -> Question<S::Skill> {
        let skill = match self.mode {
            Mode::Skill(skill) => skill,
            Mode::Mixed => self.subject.pick_skill(&self.stats, &mut self.rng),
        };
        let level = self.stats.level(skill);
        self.subject
            .create_question(skill, level, &self.settings, &self.stats, &mut self.rng)
    }

    /// Arms a fresh countdown for the current question and announces it.
    fn show_current(&mut self, now: Instant) {
        let Some(drill) = self.drill.as_ref() else {
            return;
        };
        self.timers.arm(
            TimerSlot::Countdown,
            &drill.question.id,
            now + COUNTDOWN_TICK,
        );
        self.events.push(SessionEvent::QuestionShown {
            question_id: drill.question.id.clone(),
            index: drill.current_index,
        });
    }

    fn advance(&mut self, now: Instant) {
        self.timers.cancel_all();
        let finished = match self.drill.as_ref() {
            Some(drill) => drill.is_last_question(),
            None => return,
        };
        if finished {
            self.finish();
            return;
        }

        let question = self.draw_question();
        if let Some(drill) = self.drill.as_mut() {
            drill.current_index += 1;
            drill.load_question(question, now);
        }
        self.show_current(now);
    }

    fn finish(&mut self) {
        self.timers.cancel_all();
        let Some(drill) = self.drill.take() else {
            return;
        };
        let summary = SessionSummary::from_drill(&drill, self.mode.label());
        tracing::info!(
            mode = self.mode.key(),
            correct = summary.correct,
            wrong = summary.wrong,
            accuracy = summary.accuracy_pct,
            "session finished"
        );
        self.recent.push_front(summary.clone());
        self.recent.truncate(RECENT_SUMMARIES);
        self.last_summary = Some(summary.clone());
        self.screen = Screen::Summary;
        self.events.push(SessionEvent::SessionFinished(summary));
    }

    /// Applies a verdict to the live question. Returns `None` if the
    /// question was already scored.
    fn score(&mut self, verdict: Verdict, elapsed_ms: u64, at: Instant) -> Option<Outcome<S::Skill>> {
        let drill = self.drill.as_mut()?;
        if !drill.is_awaiting() {
            return None;
        }

        let skill = drill.question.skill;
        let result = AnswerResult {
            correct: verdict.is_correct(),
            elapsed_ms,
        };
        let before = self.stats.get(skill).clone();
        let after = self.subject.apply_result(&before, &result);
        let change = LevelChange::between(before.level, after.level);
        let expected = self
            .subject
            .answer_contract(&self.settings)
            .format_expected(&drill.question);

        let outcome = Outcome {
            question_id: drill.question.id.clone(),
            skill,
            verdict,
            result,
            expected: expected.clone(),
            level_before: before.level,
            level_after: after.level,
        };
        self.stats.replace(skill, after);

        drill.record(verdict, elapsed_ms);
        match change {
            LevelChange::Promoted => drill.promotions += 1,
            LevelChange::Demoted => drill.demotions += 1,
            LevelChange::Unchanged => {}
        }
        drill.feedback = Some(match verdict {
            Verdict::Correct => Feedback::Correct,
            Verdict::Incorrect => Feedback::Incorrect { expected },
            Verdict::TimedOut => Feedback::TimedOut { expected },
        });

        self.timers.cancel(TimerSlot::Countdown);
        if verdict.auto_advances() {
            self.timers.arm(
                TimerSlot::AutoAdvance,
                &outcome.question_id,
                at + AUTO_ADVANCE_DELAY,
            );
        }

        tracing::debug!(
            skill = skill.key(),
            ?verdict,
            elapsed_ms,
            "answer scored"
        );
        if change != LevelChange::Unchanged {
            tracing::info!(
                skill = skill.key(),
                from = outcome.level_before,
                to = outcome.level_after,
                "level changed"
            );
        }

        self.events.push(SessionEvent::Answered(outcome.clone()));
        self.events.push(SessionEvent::StatsChanged);
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;

    use super::*;
    use crate::generator::arithmetic::MathSkill;
    use crate::session::timer::AUTO_ADVANCE_DELAY;
    use crate::subject::math::MathSubject;

    fn machine(question_count: u32, time_limit_seconds: u32) -> SessionMachine<MathSubject> {
        let defaults = Settings {
            question_count,
            time_limit_seconds,
            allow_negative: false,
        };
        SessionMachine::new(MathSubject::new(), defaults, SmallRng::seed_from_u64(99))
    }

    fn current(m: &SessionMachine<MathSubject>) -> (String, i64) {
        let drill = m.drill().unwrap();
        (drill.question.id.clone(), drill.question.correct_answer)
    }

    #[test]
    fn test_starts_on_menu() {
        let m = machine(5, 10);
        assert_eq!(m.screen(), Screen::Menu);
        assert!(m.drill().is_none());
        assert_eq!(m.mode(), Mode::Mixed);
    }

    #[test]
    fn test_start_session_resets_and_arms_countdown() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.start_session(Mode::Skill(MathSkill::Add), t0);

        let drill = m.drill().unwrap();
        assert_eq!(m.screen(), Screen::Drill);
        assert_eq!(drill.current_index, 1);
        assert_eq!(drill.correct_count + drill.wrong_count, 0);
        assert_eq!(drill.time_left_seconds, 10);
        assert_eq!(drill.question.skill, MathSkill::Add);
        assert!(m.timers().is_armed(TimerSlot::Countdown));
        assert!(!m.timers().is_armed(TimerSlot::AutoAdvance));

        let events = m.drain_events();
        assert!(matches!(
            events.first(),
            Some(SessionEvent::QuestionShown { index: 1, .. })
        ));
    }

    #[test]
    fn test_countdown_counts_whole_seconds() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.start_session(Mode::Skill(MathSkill::Add), t0);

        m.tick(t0 + Duration::from_millis(999));
        assert_eq!(m.drill().unwrap().time_left_seconds, 10);
        m.tick(t0 + Duration::from_millis(1000));
        assert_eq!(m.drill().unwrap().time_left_seconds, 9);
        m.tick(t0 + Duration::from_millis(3500));
        assert_eq!(m.drill().unwrap().time_left_seconds, 7);
    }

    #[test]
    fn test_rejected_input_keeps_question_and_clock() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.start_session(Mode::Skill(MathSkill::Mul), t0);
        let (id, _) = current(&m);
        m.tick(t0 + Duration::from_secs(2));

        assert_eq!(
            m.submit_text("", t0 + Duration::from_millis(2100)),
            Submission::Rejected(AnswerError::Empty)
        );
        assert_eq!(
            m.submit_text("-", t0 + Duration::from_millis(2200)),
            Submission::Rejected(AnswerError::Empty)
        );

        let drill = m.drill().unwrap();
        assert_eq!(drill.question.id, id);
        assert!(drill.is_awaiting());
        assert_eq!(drill.time_left_seconds, 8);
        assert_eq!(drill.feedback, Some(Feedback::Rejected(AnswerError::Empty)));
        assert!(m.timers().is_armed(TimerSlot::Countdown));

        m.tick(t0 + Duration::from_secs(3));
        assert_eq!(m.drill().unwrap().time_left_seconds, 7);
    }

    #[test]
    fn test_bare_sign_is_incomplete_when_negatives_allowed() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.restore(
            None,
            None,
            Some(Settings {
                allow_negative: true,
                ..Settings::default()
            }),
        );
        m.start_session(Mode::Skill(MathSkill::Sub), t0);
        assert_eq!(
            m.submit_text("-", t0),
            Submission::Rejected(AnswerError::Incomplete)
        );
        assert!(m.drill().unwrap().is_awaiting());
    }

    #[test]
    fn test_correct_answer_scores_elapsed_time_and_auto_advances() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.start_session(Mode::Skill(MathSkill::Add), t0);
        let (id, answer) = current(&m);

        let submitted = t0 + Duration::from_millis(1800);
        let outcome = match m.submit_text(&answer.to_string(), submitted) {
            Submission::Scored(outcome) => outcome,
            other => panic!("expected a score, got {other:?}"),
        };
        assert_eq!(outcome.verdict, Verdict::Correct);
        assert_eq!(outcome.result.elapsed_ms, 1800);
        assert_eq!(m.stats().get(MathSkill::Add).history.len(), 1);
        assert!(!m.timers().is_armed(TimerSlot::Countdown));

        // Late countdown tick for the answered question does nothing.
        m.tick(submitted + Duration::from_millis(100));
        assert_eq!(m.drill().unwrap().question.id, id);

        m.tick(submitted + AUTO_ADVANCE_DELAY);
        let drill = m.drill().unwrap();
        assert_ne!(drill.question.id, id);
        assert_eq!(drill.current_index, 2);
        assert_eq!(drill.time_left_seconds, 10);
        assert!(drill.is_awaiting());
    }

    #[test]
    fn test_wrong_answer_waits_for_next() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.start_session(Mode::Skill(MathSkill::Add), t0);
        let (id, answer) = current(&m);

        m.submit_text(&(answer + 1).to_string(), t0 + Duration::from_secs(1));
        assert!(!m.timers().is_armed(TimerSlot::AutoAdvance));
        assert_eq!(
            m.drill().unwrap().feedback,
            Some(Feedback::Incorrect {
                expected: answer.to_string()
            })
        );

        m.tick(t0 + Duration::from_secs(30));
        assert_eq!(m.drill().unwrap().question.id, id);

        assert!(m.next_question(t0 + Duration::from_secs(31)));
        assert_eq!(m.drill().unwrap().current_index, 2);
    }

    #[test]
    fn test_second_submission_is_ignored() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.start_session(Mode::Skill(MathSkill::Div), t0);
        let (_, answer) = current(&m);
        m.submit_text(&answer.to_string(), t0);
        assert_eq!(m.submit_text("1", t0), Submission::Ignored);
        assert_eq!(m.drill().unwrap().correct_count, 1);
        assert_eq!(m.stats().get(MathSkill::Div).history.len(), 1);
    }

    #[test]
    fn test_next_question_requires_an_answer() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.start_session(Mode::Skill(MathSkill::Add), t0);
        assert!(!m.next_question(t0));
        assert_eq!(m.drill().unwrap().current_index, 1);
    }

    #[test]
    fn test_timeout_scores_once_and_auto_advances() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.start_session(Mode::Skill(MathSkill::Add), t0);
        let (id, _) = current(&m);
        m.drain_events();

        m.tick(t0 + Duration::from_secs(10));
        let drill = m.drill().unwrap();
        assert_eq!(drill.question.id, id);
        assert_eq!(drill.time_left_seconds, 0);
        assert_eq!(drill.verdict(), Some(Verdict::TimedOut));
        assert_eq!(drill.wrong_count, 1);
        assert!(m.timers().is_armed(TimerSlot::AutoAdvance));

        let history = &m.stats().get(MathSkill::Add).history;
        assert_eq!(history.len(), 1);
        assert!(!history[0].correct);
        assert_eq!(history[0].elapsed_ms, 10_000);

        let answered: Vec<_> = m
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::Answered(outcome) => Some(outcome),
                _ => None,
            })
            .collect();
        assert_eq!(answered.len(), 1);
        assert!(answered[0].timed_out());

        // Submitting after the timeout does not score again.
        assert_eq!(m.submit_text("2", t0 + Duration::from_millis(10_100)), Submission::Ignored);
        assert_eq!(m.stats().get(MathSkill::Add).history.len(), 1);

        m.tick(t0 + Duration::from_millis(10_700));
        assert_eq!(m.drill().unwrap().current_index, 2);
    }

    #[test]
    fn test_late_submit_after_deadline_is_a_timeout() {
        let t0 = Instant::now();
        let mut m = machine(5, 5);
        m.start_session(Mode::Skill(MathSkill::Add), t0);
        let (_, answer) = current(&m);
        let result = m.submit_text(&answer.to_string(), t0 + Duration::from_millis(5050));
        assert_eq!(result, Submission::Ignored);
        assert_eq!(m.drill().unwrap().verdict(), Some(Verdict::TimedOut));
    }

    #[test]
    fn test_return_to_menu_cancels_timers() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.start_session(Mode::Skill(MathSkill::Add), t0);
        let (_, answer) = current(&m);
        m.submit_text(&answer.to_string(), t0);
        assert!(m.timers().is_armed(TimerSlot::AutoAdvance));

        m.return_to_menu();
        assert_eq!(m.screen(), Screen::Menu);
        assert!(m.drill().is_none());
        assert_eq!(m.timers().next_deadline(), None);

        m.tick(t0 + Duration::from_secs(60));
        assert_eq!(m.screen(), Screen::Menu);
    }

    #[test]
    fn test_side_screens_not_reachable_mid_drill() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        assert!(m.open_settings());
        assert_eq!(m.screen(), Screen::Settings);
        m.return_to_menu();
        assert!(m.open_stats());
        m.return_to_menu();

        m.start_session(Mode::Mixed, t0);
        assert!(!m.open_stats());
        assert!(!m.open_settings());
        assert_eq!(m.screen(), Screen::Drill);
    }

    #[test]
    fn test_adjust_setting_clamps_and_reports() {
        let mut m = machine(10, 15);
        assert!(!m.adjust_setting(0, 1));
        m.open_settings();
        m.drain_events();

        assert!(m.adjust_setting(0, 1));
        assert_eq!(m.settings().question_count, 15);
        assert_eq!(m.drain_events(), vec![SessionEvent::SettingsChanged]);

        for _ in 0..20 {
            m.adjust_setting(1, 1);
        }
        assert_eq!(m.settings().time_limit_seconds, 60);
        assert!(!m.adjust_setting(1, 1));
        assert!(!m.adjust_setting(42, 1));

        m.reset_settings();
        assert_eq!(m.settings().question_count, 10);
    }

    #[test]
    fn test_restore_normalizes_settings_and_stats() {
        let mut m = machine(10, 15);
        let mut stats: Stats<MathSkill> = Stats::fresh();
        let mut add = stats.get(MathSkill::Add).clone();
        add.level = 500;
        stats.replace(MathSkill::Add, add);
        m.restore(
            Some(stats),
            Some(Mode::Skill(MathSkill::Div)),
            Some(Settings {
                question_count: 1000,
                time_limit_seconds: 0,
                allow_negative: false,
            }),
        );
        assert_eq!(m.stats().level(MathSkill::Add), 20);
        assert_eq!(m.mode(), Mode::Skill(MathSkill::Div));
        assert_eq!(m.settings().question_count, 50);
        assert_eq!(m.settings().time_limit_seconds, 5);
    }

    #[test]
    fn test_three_question_session_is_kept() {
        let mut m = machine(3, 10);
        assert_eq!(m.settings().question_count, 3);
        m.restore(None, None, None);
        assert_eq!(m.settings().question_count, 3);

        m.start_session(Mode::Skill(MathSkill::Add), Instant::now());
        assert_eq!(m.drill().unwrap().question_count, 3);
    }

    #[test]
    fn test_reset_stats_only_from_stats_screen() {
        let t0 = Instant::now();
        let mut m = machine(5, 10);
        m.start_session(Mode::Skill(MathSkill::Add), t0);
        let (_, answer) = current(&m);
        m.submit_text(&answer.to_string(), t0);
        assert!(!m.reset_stats());
        m.return_to_menu();
        m.open_stats();
        assert!(m.reset_stats());
        assert!(m.stats().get(MathSkill::Add).history.is_empty());
    }

    #[test]
    fn test_mixed_mode_draws_every_skill_eventually() {
        let t0 = Instant::now();
        let mut m = machine(50, 10);
        m.start_session(Mode::Mixed, t0);
        let mut seen = std::collections::HashSet::new();
        let mut now = t0;
        for _ in 0..49 {
            let (_, answer) = current(&m);
            seen.insert(m.drill().unwrap().question.skill);
            m.submit_text(&answer.to_string(), now);
            now += AUTO_ADVANCE_DELAY;
            m.tick(now);
        }
        assert_eq!(seen.len(), MathSkill::all().len());
    }
}
