use crate::session::drill::DrillState;
use crate::subject::answer::AnswerContract;

/// Longest answer text the input box keeps.
pub const MAX_ANSWER_LEN: usize = 12;

/// Appends `ch` to the answer text. Characters the contract does not accept
/// are dropped, and nothing changes once the question is answered.
pub fn process_char<K>(drill: &mut DrillState<K>, contract: &impl AnswerContract, ch: char) -> bool {
    if !drill.is_awaiting() || !contract.accepts(ch) {
        return false;
    }
    if drill.answer_text.chars().count() >= MAX_ANSWER_LEN {
        return false;
    }
    drill.answer_text.push(ch);
    true
}

pub fn process_backspace<K>(drill: &mut DrillState<K>) {
    if drill.is_awaiting() {
        drill.answer_text.pop();
    }
}

pub fn clear<K>(drill: &mut DrillState<K>) {
    if drill.is_awaiting() {
        drill.answer_text.clear();
    }
}
