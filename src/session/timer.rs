use std::time::{Duration, Instant};

/// Countdown granularity.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);
/// Delay before moving on after a correct answer or a timeout.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(700);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerSlot {
    Countdown,
    AutoAdvance,
}

/// A deadline tied to the question it was armed for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Armed {
    pub question_id: String,
    pub deadline: Instant,
}

/// The two timer slots a live question can hold. Arming a slot drops
/// whatever was armed there before, so a stale deadline can never fire.
#[derive(Debug, Default)]
pub struct Timers {
    countdown: Option<Armed>,
    advance: Option<Armed>,
}

impl Timers {
    fn slot_mut(&mut self, slot: TimerSlot) -> &mut Option<Armed> {
        match slot {
            TimerSlot::Countdown => &mut self.countdown,
            TimerSlot::AutoAdvance => &mut self.advance,
        }
    }

    fn slot(&self, slot: TimerSlot) -> &Option<Armed> {
        match slot {
            TimerSlot::Countdown => &self.countdown,
            TimerSlot::AutoAdvance => &self.advance,
        }
    }

    pub fn arm(&mut self, slot: TimerSlot, question_id: &str, deadline: Instant) {
        *self.slot_mut(slot) = Some(Armed {
            question_id: question_id.to_string(),
            deadline,
        });
    }

    pub fn cancel(&mut self, slot: TimerSlot) {
        *self.slot_mut(slot) = None;
    }

    pub fn cancel_all(&mut self) {
        self.countdown = None;
        self.advance = None;
    }

    pub fn is_armed(&self, slot: TimerSlot) -> bool {
        self.slot(slot).is_some()
    }

    pub fn armed(&self, slot: TimerSlot) -> Option<&Armed> {
        self.slot(slot).as_ref()
    }

    /// Disarms and returns the slot's timer if its deadline has passed.
    pub fn take_due(&mut self, slot: TimerSlot, now: Instant) -> Option<Armed> {
        let entry = self.slot_mut(slot);
        if entry.as_ref().is_some_and(|armed| armed.deadline <= now) {
            entry.take()
        } else {
            None
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        [&self.countdown, &self.advance]
            .into_iter()
            .flatten()
            .map(|armed| armed.deadline)
            .min()
    }
}
