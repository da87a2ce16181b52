//! Participants and the two-slot pair that holds them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the two fixed seats of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// First joiner; opens play.
    A,
    /// Second joiner.
    B,
}

impl Slot {
    /// Both slots in seating order.
    pub const ALL: [Slot; 2] = [Slot::A, Slot::B];

    /// The other seat.
    #[must_use]
    pub fn opponent(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

/// Final standing of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Won (a tie marks both participants as won).
    Won,
    /// Lost.
    Lost,
}

/// Per-player state.
///
/// `guessed_letters`, `wrong_guess_count`, `turns_taken` and `score` describe
/// this participant's guessing against the opponent. `words`,
/// `remaining_words` and `active_word` are this participant's own secrets.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Seat of this participant.
    pub slot: Slot,
    /// Transport connection bound at join time.
    pub connection_id: Option<Uuid>,
    /// Display name, one of the allowed identities.
    pub name: Option<String>,
    /// Secret words submitted during setup.
    pub words: Vec<String>,
    /// Own words the opponent has not resolved yet.
    pub remaining_words: Vec<String>,
    /// Own word currently exposed to the opponent.
    pub active_word: Option<String>,
    /// Signed running score.
    pub score: i64,
    /// Number of guesses made.
    pub turns_taken: u32,
    /// Letters tried against the opponent's active word, in guess order.
    pub guessed_letters: Vec<char>,
    /// Letters tried that were not in the opponent's active word.
    pub wrong_guess_count: u32,
    /// Guesses left in the single-word variant; `None` in the multi-word one.
    pub guesses_remaining: Option<u32>,
    /// Final standing, `None` while unresolved.
    pub outcome: Option<Outcome>,
}

impl Participant {
    /// Creates an empty, unseated participant.
    #[must_use]
    pub fn empty(slot: Slot) -> Self {
        Self {
            slot,
            connection_id: None,
            name: None,
            words: Vec::new(),
            remaining_words: Vec::new(),
            active_word: None,
            score: 0,
            turns_taken: 0,
            guessed_letters: Vec::new(),
            wrong_guess_count: 0,
            guesses_remaining: None,
            outcome: None,
        }
    }

    /// Returns `true` once a connection holds this seat.
    #[must_use]
    pub fn is_seated(&self) -> bool {
        self.connection_id.is_some()
    }

    /// Returns `true` once words were submitted.
    #[must_use]
    pub fn has_submitted(&self) -> bool {
        !self.words.is_empty()
    }

    /// Name for narration, falling back to the seat.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Player {:?}", self.slot))
    }
}

/// Exactly two participants, addressed by `Slot`.
#[derive(Debug, Clone)]
pub struct ParticipantPair {
    a: Participant,
    b: Participant,
}

impl ParticipantPair {
    /// Creates a pair of empty participants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: Participant::empty(Slot::A),
            b: Participant::empty(Slot::B),
        }
    }

    /// Returns the participant in `slot`.
    #[must_use]
    pub fn get(&self, slot: Slot) -> &Participant {
        match slot {
            Slot::A => &self.a,
            Slot::B => &self.b,
        }
    }

    /// Returns the participant in `slot` mutably.
    pub fn get_mut(&mut self, slot: Slot) -> &mut Participant {
        match slot {
            Slot::A => &mut self.a,
            Slot::B => &mut self.b,
        }
    }

    /// Maps a transport connection to its seat.
    #[must_use]
    pub fn slot_of(&self, connection_id: Uuid) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| self.get(*slot).connection_id == Some(connection_id))
    }

    /// Iterates over both participants in seating order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        [&self.a, &self.b].into_iter()
    }
}

impl Default for ParticipantPair {
    fn default() -> Self {
        Self::new()
    }
}
