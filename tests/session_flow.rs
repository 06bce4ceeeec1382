use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use mathdr::engine::stats::SkillKey;
use mathdr::generator::arithmetic::MathSkill;
use mathdr::session::drill::Verdict;
use mathdr::session::machine::{Screen, SessionEvent, SessionMachine, Submission};
use mathdr::session::mode::Mode;
use mathdr::session::timer::{AUTO_ADVANCE_DELAY, TimerSlot};
use mathdr::settings::Settings;
use mathdr::store::json_store::JsonStore;
use mathdr::store::schema::SessionData;
use mathdr::subject::answer::AnswerError;
use mathdr::subject::math::MathSubject;

fn machine_with(question_count: u32, time_limit_seconds: u32, seed: u64) -> SessionMachine<MathSubject> {
    let defaults = Settings {
        question_count,
        time_limit_seconds,
        allow_negative: false,
    };
    SessionMachine::new(MathSubject::new(), defaults, SmallRng::seed_from_u64(seed))
}

fn correct_answer(machine: &SessionMachine<MathSubject>) -> i64 {
    machine.drill().unwrap().question.correct_answer
}

#[test]
fn three_questions_two_right_one_wrong_reaches_summary() {
    let t0 = Instant::now();
    let mut m = machine_with(3, 10, 11);
    m.start_session(Mode::Mixed, t0);

    // Q1 correct, auto-advances.
    let answer = correct_answer(&m);
    let t1 = t0 + Duration::from_millis(1200);
    assert!(matches!(m.submit_text(&answer.to_string(), t1), Submission::Scored(_)));
    m.tick(t1 + AUTO_ADVANCE_DELAY);
    assert_eq!(m.drill().unwrap().current_index, 2);

    // Q2 wrong, waits for an explicit next.
    let answer = correct_answer(&m);
    let t2 = t1 + Duration::from_secs(2);
    m.submit_text(&(answer + 1).to_string(), t2);
    assert!(m.next_question(t2 + Duration::from_secs(1)));
    assert_eq!(m.drill().unwrap().current_index, 3);

    // Q3 correct; the auto-advance past the last question lands on the summary.
    let answer = correct_answer(&m);
    let t3 = t2 + Duration::from_secs(3);
    m.submit_text(&answer.to_string(), t3);
    m.tick(t3 + AUTO_ADVANCE_DELAY);

    assert_eq!(m.screen(), Screen::Summary);
    assert!(m.drill().is_none());
    let summary = m.last_summary().unwrap();
    assert_eq!(summary.accuracy_pct, 67);
    assert_eq!(summary.correct, 2);
    assert_eq!(summary.wrong, 1);
    assert_eq!(summary.mode, "Mixed");
    assert_eq!(m.timers().next_deadline(), None);

    let finished = m
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::SessionFinished(_)))
        .count();
    assert_eq!(finished, 1);
}

#[test]
fn countdown_reaching_zero_times_out_and_schedules_advance() {
    let t0 = Instant::now();
    let mut m = machine_with(5, 10, 3);
    m.start_session(Mode::Skill(MathSkill::Mul), t0);

    for second in 1..10 {
        m.tick(t0 + Duration::from_secs(second));
        assert!(m.drill().unwrap().is_awaiting());
    }
    assert_eq!(m.drill().unwrap().time_left_seconds, 1);

    m.tick(t0 + Duration::from_secs(10));
    let drill = m.drill().unwrap();
    assert_eq!(drill.verdict(), Some(Verdict::TimedOut));
    assert_eq!(drill.time_left_seconds, 0);

    let last = m.stats().get(MathSkill::Mul).history.last().copied().unwrap();
    assert!(!last.correct);

    let armed = m.timers().armed(TimerSlot::AutoAdvance).unwrap();
    assert_eq!(armed.question_id, drill.question.id);
    assert_eq!(armed.deadline, t0 + Duration::from_secs(10) + AUTO_ADVANCE_DELAY);

    let timed_out: Vec<_> = m
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            SessionEvent::Answered(outcome) => Some(outcome),
            _ => None,
        })
        .collect();
    assert_eq!(timed_out.len(), 1);
    assert!(timed_out[0].timed_out());
    assert!(!timed_out[0].result.correct);
}

#[test]
fn bare_minus_is_rejected_when_negatives_are_off() {
    let t0 = Instant::now();
    let mut m = machine_with(5, 10, 8);
    m.start_session(Mode::Skill(MathSkill::Sub), t0);
    m.drain_events();

    assert_eq!(
        m.submit_text("-", t0 + Duration::from_millis(300)),
        Submission::Rejected(AnswerError::Empty)
    );
    assert_eq!(
        m.drain_events(),
        vec![SessionEvent::AnswerRejected(AnswerError::Empty)]
    );

    let drill = m.drill().unwrap();
    assert!(drill.is_awaiting());
    assert_eq!(drill.answered_count(), 0);
    assert!(m.timers().is_armed(TimerSlot::Countdown));
    assert!(m.stats().get(MathSkill::Sub).history.is_empty());

    // The rejected submission did not buy extra time.
    m.tick(t0 + Duration::from_secs(10));
    assert_eq!(m.drill().unwrap().verdict(), Some(Verdict::TimedOut));
}

#[test]
fn leaving_mid_question_makes_pending_timers_harmless() {
    let t0 = Instant::now();
    let mut m = machine_with(5, 10, 21);
    m.start_session(Mode::Skill(MathSkill::Add), t0);
    let answer = correct_answer(&m);
    m.submit_text(&answer.to_string(), t0 + Duration::from_millis(500));

    m.return_to_menu();
    m.tick(t0 + Duration::from_secs(5));
    assert_eq!(m.screen(), Screen::Menu);
    assert!(m.drill().is_none());

    // A fresh session starts clean at question one.
    m.start_session(Mode::Skill(MathSkill::Add), t0 + Duration::from_secs(6));
    let drill = m.drill().unwrap();
    assert_eq!(drill.current_index, 1);
    assert_eq!(drill.answered_count(), 0);
    assert_eq!(drill.time_left_seconds, 10);
}

#[test]
fn fast_streak_promotes_and_misses_demote() {
    let t0 = Instant::now();
    let mut m = machine_with(20, 10, 4);
    m.start_session(Mode::Skill(MathSkill::Add), t0);
    let mut now = t0;

    for _ in 0..3 {
        let answer = correct_answer(&m);
        now += Duration::from_millis(900);
        m.submit_text(&answer.to_string(), now);
        now += AUTO_ADVANCE_DELAY;
        m.tick(now);
    }
    assert_eq!(m.stats().level(MathSkill::Add), 2);

    for _ in 0..2 {
        let answer = correct_answer(&m);
        now += Duration::from_millis(900);
        m.submit_text(&(answer + 1).to_string(), now);
        m.next_question(now);
    }
    assert_eq!(m.stats().level(MathSkill::Add), 1);
    assert_eq!(m.drill().unwrap().promotions, 1);
    assert_eq!(m.drill().unwrap().demotions, 1);
}

#[test]
fn practice_again_reuses_the_mode() {
    let t0 = Instant::now();
    let mut m = machine_with(5, 10, 9);
    m.start_session(Mode::Skill(MathSkill::Div), t0);
    let mut now = t0;
    while m.screen() == Screen::Drill {
        let answer = correct_answer(&m);
        now += Duration::from_secs(1);
        m.submit_text(&answer.to_string(), now);
        now += AUTO_ADVANCE_DELAY;
        m.tick(now);
    }
    assert_eq!(m.screen(), Screen::Summary);
    assert_eq!(m.last_summary().unwrap().accuracy_pct, 100);

    assert!(m.practice_again(now));
    assert_eq!(m.screen(), Screen::Drill);
    assert_eq!(m.drill().unwrap().question.skill, MathSkill::Div);
    assert_eq!(m.recent_summaries().count(), 1);
}

#[test]
fn saved_session_round_trips_through_the_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();

    let t0 = Instant::now();
    let mut m = machine_with(5, 10, 30);
    m.start_session(Mode::Skill(MathSkill::Sub), t0);
    let answer = correct_answer(&m);
    m.submit_text(&answer.to_string(), t0 + Duration::from_secs(2));

    store
        .save_session(&SessionData {
            stats: m.stats().clone(),
            mode: m.mode(),
        })
        .unwrap();
    store.save_settings(m.settings()).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["mode"], "sub");
    assert_eq!(value["stats"]["sub"]["history"][0]["elapsedMs"], 2000);

    let loaded = store.load_session::<MathSkill>().unwrap();
    let mut restored = machine_with(10, 15, 31);
    restored.restore(Some(loaded.stats), Some(loaded.mode), store.load_settings());
    assert_eq!(restored.mode(), Mode::Skill(MathSkill::Sub));
    assert_eq!(restored.stats(), m.stats());
    assert_eq!(restored.settings().question_count, 5);
    for &skill in MathSkill::all() {
        assert!(restored.stats().level(skill) >= 1);
    }
}
