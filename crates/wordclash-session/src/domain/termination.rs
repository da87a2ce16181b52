//! Termination rules for both variants.
//!
//! Both evaluators are pure: they read the participant pair after a guess
//! has been applied and return a `Verdict` the aggregate turns into events.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::participant::{Outcome, Participant, ParticipantPair, Slot};
use super::scoring::letters_remaining;

/// Progress of the single-word tie-break.
///
/// `Open` until someone wins. If the opening player wins first and the
/// opponent qualifies, the machine moves to `AwaitingTie` for exactly one
/// bonus turn. Every terminal path ends in `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TieBreak {
    /// Nobody has won yet.
    Open,
    /// `leader` has won; the opponent is on their bonus turn.
    AwaitingTie {
        /// The participant who finished first.
        leader: Slot,
    },
    /// The session is finished.
    Closed,
}

/// Final result of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "slot", rename_all = "kebab-case")]
pub enum SessionResult {
    /// One participant won.
    Winner(Slot),
    /// Both participants won, or scores were equal.
    Tie,
    /// Both participants lost.
    NoWinner,
}

/// What happens after a guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Play goes on with `next_turn` to move.
    Continue {
        /// Participant whose guess is accepted next.
        next_turn: Slot,
    },
    /// The single-word bonus turn is granted to `challenger`.
    OpenTieWindow {
        /// Participant who finished first.
        leader: Slot,
        /// Participant granted one more turn.
        challenger: Slot,
    },
    /// The session is over.
    Finish {
        /// Outcomes to record that are not recorded yet.
        outcomes: Vec<(Slot, Outcome)>,
        /// Final result.
        result: SessionResult,
    },
}

/// Evaluates the single-word rules after `mover`'s guess.
///
/// The mover's own outcome (won on reveal, lost on an exhausted budget or a
/// wrong word guess) is already recorded on the pair. `opener` is the
/// participant who moved first; only their opponent can ever receive the
/// bonus turn.
#[must_use]
pub fn evaluate_single_word(
    pair: &ParticipantPair,
    mover: Slot,
    opener: Slot,
    tie_break: TieBreak,
) -> Verdict {
    let opponent = mover.opponent();
    let me = pair.get(mover);
    let them = pair.get(opponent);

    match tie_break {
        TieBreak::AwaitingTie { .. } => {
            if me.outcome == Some(Outcome::Won) {
                finish(pair, Vec::new())
            } else {
                finish(pair, vec![(mover, Outcome::Lost)])
            }
        }
        TieBreak::Closed => finish(pair, Vec::new()),
        TieBreak::Open => match me.outcome {
            Some(Outcome::Won) => {
                if mover == opener && may_attempt_tie(me, them) {
                    Verdict::OpenTieWindow {
                        leader: mover,
                        challenger: opponent,
                    }
                } else if them.outcome.is_none() {
                    finish(pair, vec![(opponent, Outcome::Lost)])
                } else {
                    finish(pair, Vec::new())
                }
            }
            Some(Outcome::Lost) => {
                if them.outcome.is_some() {
                    finish(pair, Vec::new())
                } else {
                    Verdict::Continue {
                        next_turn: opponent,
                    }
                }
            }
            None => {
                // A participant who has already lost never gets the turn back.
                let next_turn = if them.outcome.is_some() {
                    mover
                } else {
                    opponent
                };
                Verdict::Continue { next_turn }
            }
        },
    }
}

/// Evaluates the multi-word rules after `mover`'s guess.
///
/// The session ends when both participants used the turn limit, or when one
/// side has no words left and both took the same number of turns. The
/// higher score wins.
#[must_use]
pub fn evaluate_multi_word(pair: &ParticipantPair, mover: Slot, turn_limit: u32) -> Verdict {
    let a = pair.get(Slot::A);
    let b = pair.get(Slot::B);

    let limit_reached = a.turns_taken >= turn_limit && b.turns_taken >= turn_limit;
    let words_exhausted = a.remaining_words.is_empty() || b.remaining_words.is_empty();
    let turns_even = a.turns_taken == b.turns_taken;

    if !(limit_reached || (words_exhausted && turns_even)) {
        return Verdict::Continue {
            next_turn: mover.opponent(),
        };
    }

    let (outcomes, result) = match a.score.cmp(&b.score) {
        Ordering::Greater => (
            vec![(Slot::A, Outcome::Won), (Slot::B, Outcome::Lost)],
            SessionResult::Winner(Slot::A),
        ),
        Ordering::Less => (
            vec![(Slot::A, Outcome::Lost), (Slot::B, Outcome::Won)],
            SessionResult::Winner(Slot::B),
        ),
        Ordering::Equal => (
            vec![(Slot::A, Outcome::Won), (Slot::B, Outcome::Won)],
            SessionResult::Tie,
        ),
    };
    Verdict::Finish { outcomes, result }
}

/// The challenger may attempt a tie only with budget left and exactly one
/// undiscovered letter in the leader's word.
fn may_attempt_tie(leader: &Participant, challenger: &Participant) -> bool {
    challenger.outcome.is_none()
        && challenger.guesses_remaining.is_some_and(|left| left > 0)
        && leader
            .active_word
            .as_deref()
            .is_some_and(|word| letters_remaining(word, &challenger.guessed_letters) == 1)
}

fn finish(pair: &ParticipantPair, outcomes: Vec<(Slot, Outcome)>) -> Verdict {
    let final_outcome = |slot: Slot| {
        outcomes
            .iter()
            .find(|(assigned, _)| *assigned == slot)
            .map(|(_, outcome)| *outcome)
            .or(pair.get(slot).outcome)
    };
    let result = match (final_outcome(Slot::A), final_outcome(Slot::B)) {
        (Some(Outcome::Won), Some(Outcome::Won)) => SessionResult::Tie,
        (Some(Outcome::Won), _) => SessionResult::Winner(Slot::A),
        (_, Some(Outcome::Won)) => SessionResult::Winner(Slot::B),
        _ => SessionResult::NoWinner,
    };
    let outcomes = outcomes
        .into_iter()
        .filter(|(slot, outcome)| pair.get(*slot).outcome != Some(*outcome))
        .collect();
    Verdict::Finish { outcomes, result }
}
