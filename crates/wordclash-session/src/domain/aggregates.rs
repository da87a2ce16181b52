//! Aggregate root for the Session context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wordclash_core::aggregate::AggregateRoot;
use wordclash_core::clock::Clock;
use wordclash_core::error::DomainError;
use wordclash_core::event::EventMetadata;
use wordclash_core::rng::DeterministicRng;

use super::events::{
    LetterGuessed, OutcomeRecorded, ParticipantJoined, ParticipantLeft, PlayStarted,
    SessionEvent, SessionEventKind, SessionFinished, TieWindowOpened, TurnPassed, WordGuessed,
    WordResolved, WordsSubmitted,
};
use super::participant::{Outcome, Participant, ParticipantPair, Slot};
use super::scoring::{is_revealed, resolution_points, wrong_guess_penalty};
use super::settings::{GameVariant, SessionSettings};
use super::termination::{
    SessionResult, TieBreak, Verdict, evaluate_multi_word, evaluate_single_word,
};
use super::words::{normalize_batch, normalize_guess, normalize_letter};

/// Narrator of every log entry written by the session.
pub const REFEREE: &str = "Referee";

/// Session lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// One participant seated.
    Waiting,
    /// Both seated, collecting words.
    Setup,
    /// Guessing.
    Playing,
    /// A termination rule fired.
    Finished,
}

/// One narration line of the event log.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Who is speaking.
    pub source: String,
    /// The line.
    pub text: String,
    /// When it was written.
    pub time: DateTime<Utc>,
}

/// The aggregate root for a two-player session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Rules fixed at creation.
    pub(crate) settings: SessionSettings,
    /// Lifecycle phase.
    pub(crate) phase: Phase,
    /// Both seats.
    pub(crate) participants: ParticipantPair,
    /// Participant whose guess is accepted; `None` outside `Playing`.
    pub(crate) current_turn: Option<Slot>,
    /// Participant who moved first.
    pub(crate) opening_turn: Slot,
    /// Single-word tie-break progress.
    pub(crate) tie_break: TieBreak,
    /// Final result once finished.
    pub(crate) result: Option<SessionResult>,
    /// Append-only narration.
    pub(crate) event_log: Vec<LogEntry>,
    /// Uncommitted events pending publication.
    uncommitted_events: Vec<SessionEvent>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new(id: Uuid, settings: SessionSettings) -> Self {
        Self {
            id,
            version: 0,
            settings,
            phase: Phase::Waiting,
            participants: ParticipantPair::new(),
            current_turn: None,
            opening_turn: Slot::A,
            tie_break: TieBreak::Open,
            result: None,
            event_log: Vec::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Creates a session with its first participant seated.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IdentityViolation` if `name` may not play.
    pub fn open(
        id: Uuid,
        settings: SessionSettings,
        connection_id: Uuid,
        name: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let mut session = Self::new(id, settings);
        session.join(connection_id, name, correlation_id, clock)?;
        Ok(session)
    }

    /// Rules of this session.
    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Both participants.
    #[must_use]
    pub fn participants(&self) -> &ParticipantPair {
        &self.participants
    }

    /// Participant to move, if playing.
    #[must_use]
    pub fn current_turn(&self) -> Option<Slot> {
        self.current_turn
    }

    /// Single-word tie-break progress.
    #[must_use]
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Final result, once finished.
    #[must_use]
    pub fn result(&self) -> Option<SessionResult> {
        self.result
    }

    /// Narration so far.
    #[must_use]
    pub fn event_log(&self) -> &[LogEntry] {
        &self.event_log
    }

    /// Maps a connection to its seat.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IdentityViolation` for connections without a seat.
    pub fn ensure_member(&self, connection_id: Uuid) -> Result<Slot, DomainError> {
        self.participants.slot_of(connection_id).ok_or_else(|| {
            DomainError::IdentityViolation("you are not in this session".to_owned())
        })
    }

    /// Seats a connection as `name`: slot A first, then slot B.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IdentityViolation` if the name is not allowed,
    /// the connection or name is already seated, or both seats are taken.
    pub fn join(
        &mut self,
        connection_id: Uuid,
        name: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Slot, DomainError> {
        let name = name.trim();
        if !self.settings.allows(name) {
            let [first, second] = self.settings.allowed_names();
            return Err(DomainError::IdentityViolation(format!(
                "only {first} and {second} can play this game"
            )));
        }
        if self.participants.slot_of(connection_id).is_some() {
            return Err(DomainError::IdentityViolation(
                "this connection already holds a seat".to_owned(),
            ));
        }

        let slot = match (
            self.participants.get(Slot::A).is_seated(),
            self.participants.get(Slot::B).is_seated(),
        ) {
            (false, _) => Slot::A,
            (true, false) => Slot::B,
            (true, true) => {
                return Err(DomainError::IdentityViolation(
                    "the session is full; wait for the current game to finish".to_owned(),
                ));
            }
        };
        if self.participants.get(slot.opponent()).name.as_deref() == Some(name) {
            return Err(DomainError::IdentityViolation(format!(
                "{name} is already in the game"
            )));
        }

        self.record(
            SessionEventKind::ParticipantJoined(ParticipantJoined {
                session_id: self.id,
                slot,
                connection_id,
                name: name.to_owned(),
            }),
            correlation_id,
            clock,
        );
        Ok(slot)
    }

    /// Checks a word batch without mutating anything and returns the seat
    /// and normalized words. Dictionary validation happens between this and
    /// [`Session::submit_words`].
    ///
    /// # Errors
    ///
    /// Returns `PhaseViolation` outside setup, `IdentityViolation` for
    /// strangers, and `InputValidation` for repeated submissions or a
    /// malformed batch.
    pub fn prepare_submission(
        &self,
        connection_id: Uuid,
        raw_words: &[String],
    ) -> Result<(Slot, Vec<String>), DomainError> {
        if self.phase != Phase::Setup {
            return Err(DomainError::PhaseViolation(
                "words can only be submitted during setup".to_owned(),
            ));
        }
        let slot = self.ensure_member(connection_id)?;
        if self.participants.get(slot).has_submitted() {
            return Err(DomainError::InputValidation(
                "your words were already submitted".to_owned(),
            ));
        }
        let words = normalize_batch(raw_words, self.settings.variant().word_count())?;
        Ok((slot, words))
    }

    /// Commits a dictionary-validated word batch and draws the first active
    /// word. Starts play once both participants have submitted.
    ///
    /// # Errors
    ///
    /// Same as [`Session::prepare_submission`], which is re-run here.
    pub fn submit_words(
        &mut self,
        connection_id: Uuid,
        words: &[String],
        correlation_id: Uuid,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Slot, DomainError> {
        let (slot, words) = self.prepare_submission(connection_id, words)?;
        let active_word = draw_word(&words, rng)
            .ok_or_else(|| DomainError::InputValidation("no words submitted".to_owned()))?;

        self.record(
            SessionEventKind::WordsSubmitted(WordsSubmitted {
                session_id: self.id,
                slot,
                words,
                active_word,
            }),
            correlation_id,
            clock,
        );

        if self.participants.iter().all(Participant::has_submitted) {
            self.record(
                SessionEventKind::PlayStarted(PlayStarted {
                    session_id: self.id,
                    opening_turn: Slot::A,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(slot)
    }

    /// Applies a letter guess for the participant on turn.
    ///
    /// # Errors
    ///
    /// Returns, in this order: `PhaseViolation` outside play,
    /// `IdentityViolation` for strangers, `TurnViolation` out of turn,
    /// `InputValidation` for a malformed or repeated letter.
    pub fn guess_letter(
        &mut self,
        connection_id: Uuid,
        raw_letter: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Slot, DomainError> {
        let slot = self.begin_guess(connection_id)?;
        let letter = normalize_letter(raw_letter)?;
        if self.participants.get(slot).guessed_letters.contains(&letter) {
            return Err(DomainError::InputValidation(format!(
                "you already guessed \"{}\"",
                letter.to_ascii_uppercase()
            )));
        }
        let target = self.target_word(slot)?;

        self.record(
            SessionEventKind::LetterGuessed(LetterGuessed {
                session_id: self.id,
                slot,
                letter,
                hit: target.contains(letter),
            }),
            correlation_id,
            clock,
        );

        let guesser = self.participants.get(slot);
        if is_revealed(&target, &guesser.guessed_letters) {
            self.resolve_active_word(slot, true, correlation_id, clock, rng);
        } else if guesser.guesses_remaining == Some(0) {
            self.record(
                SessionEventKind::OutcomeRecorded(OutcomeRecorded {
                    session_id: self.id,
                    slot,
                    outcome: Outcome::Lost,
                }),
                correlation_id,
                clock,
            );
        }

        self.conclude_turn(slot, correlation_id, clock);
        Ok(slot)
    }

    /// Applies a whole-word guess for the participant on turn. Right or
    /// wrong, the opponent's active word leaves play.
    ///
    /// # Errors
    ///
    /// Same precondition order as [`Session::guess_letter`];
    /// `InputValidation` for an empty or non-alphabetic guess.
    pub fn guess_word(
        &mut self,
        connection_id: Uuid,
        raw_guess: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Slot, DomainError> {
        let slot = self.begin_guess(connection_id)?;
        let guess = normalize_guess(raw_guess)?;
        let target = self.target_word(slot)?;
        let matched = guess == target;

        self.record(
            SessionEventKind::WordGuessed(WordGuessed {
                session_id: self.id,
                slot,
                guess,
                matched,
            }),
            correlation_id,
            clock,
        );
        self.resolve_active_word(slot, matched, correlation_id, clock, rng);
        self.conclude_turn(slot, correlation_id, clock);
        Ok(slot)
    }

    /// Records the departure of a seated connection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IdentityViolation` for strangers.
    pub fn depart(
        &mut self,
        connection_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Slot, DomainError> {
        let slot = self.ensure_member(connection_id)?;
        self.record(
            SessionEventKind::ParticipantLeft(ParticipantLeft {
                session_id: self.id,
                slot,
            }),
            correlation_id,
            clock,
        );
        Ok(slot)
    }

    fn begin_guess(&self, connection_id: Uuid) -> Result<Slot, DomainError> {
        if self.phase != Phase::Playing {
            return Err(DomainError::PhaseViolation(
                "guesses are only accepted while playing".to_owned(),
            ));
        }
        let slot = self.ensure_member(connection_id)?;
        if self.current_turn != Some(slot) {
            return Err(DomainError::TurnViolation("it's not your turn".to_owned()));
        }
        if let Some(limit) = self.settings.variant().turn_limit() {
            if self.participants.get(slot).turns_taken >= limit {
                return Err(DomainError::TurnViolation(
                    "you have no turns left".to_owned(),
                ));
            }
        }
        Ok(slot)
    }

    fn target_word(&self, slot: Slot) -> Result<String, DomainError> {
        self.participants
            .get(slot.opponent())
            .active_word
            .clone()
            .ok_or_else(|| DomainError::InputValidation("there is no word left to guess".to_owned()))
    }

    /// Scores the solver, removes the opponent's active word and draws the
    /// next one. In the single-word variant this also decides the solver.
    fn resolve_active_word(
        &mut self,
        solver: Slot,
        matched: bool,
        correlation_id: Uuid,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) {
        let owner = self.participants.get(solver.opponent());
        let Some(word) = owner.active_word.clone() else {
            return;
        };
        let points = if matched {
            resolution_points(&word, self.participants.get(solver).wrong_guess_count)
        } else {
            -wrong_guess_penalty(&word)
        };
        let remaining: Vec<String> = owner
            .remaining_words
            .iter()
            .filter(|candidate| **candidate != word)
            .cloned()
            .collect();
        let next_active_word = draw_word(&remaining, rng);

        self.record(
            SessionEventKind::WordResolved(WordResolved {
                session_id: self.id,
                solver,
                word,
                matched,
                points,
                next_active_word,
            }),
            correlation_id,
            clock,
        );

        if matches!(self.settings.variant(), GameVariant::SingleWord { .. }) {
            let outcome = if matched { Outcome::Won } else { Outcome::Lost };
            self.record(
                SessionEventKind::OutcomeRecorded(OutcomeRecorded {
                    session_id: self.id,
                    slot: solver,
                    outcome,
                }),
                correlation_id,
                clock,
            );
        }
    }

    /// Runs the termination rules and moves the turn pointer.
    fn conclude_turn(&mut self, mover: Slot, correlation_id: Uuid, clock: &dyn Clock) {
        let verdict = match self.settings.variant() {
            GameVariant::SingleWord { .. } => evaluate_single_word(
                &self.participants,
                mover,
                self.opening_turn,
                self.tie_break,
            ),
            GameVariant::MultiWord { turn_limit, .. } => {
                evaluate_multi_word(&self.participants, mover, turn_limit)
            }
        };

        match verdict {
            Verdict::Continue { next_turn } => self.record(
                SessionEventKind::TurnPassed(TurnPassed {
                    session_id: self.id,
                    next_turn,
                }),
                correlation_id,
                clock,
            ),
            Verdict::OpenTieWindow { leader, challenger } => self.record(
                SessionEventKind::TieWindowOpened(TieWindowOpened {
                    session_id: self.id,
                    leader,
                    challenger,
                }),
                correlation_id,
                clock,
            ),
            Verdict::Finish { outcomes, result } => {
                for (slot, outcome) in outcomes {
                    self.record(
                        SessionEventKind::OutcomeRecorded(OutcomeRecorded {
                            session_id: self.id,
                            slot,
                            outcome,
                        }),
                        correlation_id,
                        clock,
                    );
                }
                self.record(
                    SessionEventKind::SessionFinished(SessionFinished {
                        session_id: self.id,
                        result,
                    }),
                    correlation_id,
                    clock,
                );
            }
        }
    }

    /// Returns the next sequence number for a new event.
    fn next_sequence_number(&self) -> i64 {
        self.version + 1
    }

    /// Applies a new event immediately and queues it for publication.
    fn record(&mut self, kind: SessionEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = SessionEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    fn name(&self, slot: Slot) -> String {
        self.participants.get(slot).display_name()
    }

    fn narrate(&mut self, time: DateTime<Utc>, text: String) {
        self.event_log.push(LogEntry {
            source: REFEREE.to_owned(),
            text,
            time,
        });
    }

    fn result_line(&self, result: SessionResult) -> String {
        let a = self.participants.get(Slot::A);
        let b = self.participants.get(Slot::B);
        let scored = matches!(self.settings.variant(), GameVariant::MultiWord { .. });
        match result {
            SessionResult::Tie if scored => format!(
                "It's a tie! {} and {} both scored {} points!",
                a.display_name(),
                b.display_name(),
                a.score
            ),
            SessionResult::Tie => format!(
                "It's a tie! Both {} and {} guessed their words!",
                a.display_name(),
                b.display_name()
            ),
            SessionResult::Winner(slot) => {
                let winner = self.participants.get(slot);
                let loser = self.participants.get(slot.opponent());
                if scored {
                    format!(
                        "{} wins with {} points to {}!",
                        winner.display_name(),
                        winner.score,
                        loser.score
                    )
                } else {
                    format!(
                        "{} wins! They guessed \"{}\". {}'s word was \"{}\".",
                        winner.display_name(),
                        loser.words.join(", "),
                        loser.display_name(),
                        winner.words.join(", ")
                    )
                }
            }
            SessionResult::NoWinner => format!(
                "Game over! Neither player guessed their word. {}'s word was \"{}\", {}'s word was \"{}\".",
                a.display_name(),
                a.words.join(", "),
                b.display_name(),
                b.words.join(", ")
            ),
        }
    }
}

impl AggregateRoot for Session {
    type Event = SessionEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    #[allow(clippy::too_many_lines)]
    fn apply(&mut self, event: &Self::Event) {
        let time = event.metadata.occurred_at;
        match &event.kind {
            SessionEventKind::ParticipantJoined(payload) => {
                let budget = self.settings.variant().guess_budget();
                let participant = self.participants.get_mut(payload.slot);
                participant.connection_id = Some(payload.connection_id);
                participant.name = Some(payload.name.clone());
                participant.guesses_remaining = budget;
                let line = match payload.slot {
                    Slot::A => {
                        let awaited = self
                            .settings
                            .allowed_names()
                            .iter()
                            .find(|allowed| **allowed != payload.name)
                            .cloned()
                            .unwrap_or_default();
                        self.phase = Phase::Waiting;
                        format!("{} is here! Waiting for {awaited} to join...", payload.name)
                    }
                    Slot::B => {
                        self.phase = Phase::Setup;
                        format!("{} joined! Time to pick your secret words!", payload.name)
                    }
                };
                self.narrate(time, line);
            }
            SessionEventKind::WordsSubmitted(payload) => {
                let participant = self.participants.get_mut(payload.slot);
                participant.words.clone_from(&payload.words);
                participant.remaining_words.clone_from(&payload.words);
                participant.active_word = Some(payload.active_word.clone());
                let line = format!("{} is ready!", self.name(payload.slot));
                self.narrate(time, line);
            }
            SessionEventKind::PlayStarted(payload) => {
                self.phase = Phase::Playing;
                self.opening_turn = payload.opening_turn;
                self.current_turn = Some(payload.opening_turn);
                let first = self.name(payload.opening_turn);
                let second = self.name(payload.opening_turn.opponent());
                self.narrate(
                    time,
                    format!(
                        "Both players are ready! {first} will try to guess {second}'s words. {second} will try to guess {first}'s words."
                    ),
                );
                self.narrate(time, format!("{first}, it's your turn! Guess a letter."));
            }
            SessionEventKind::LetterGuessed(payload) => {
                let participant = self.participants.get_mut(payload.slot);
                participant.guessed_letters.push(payload.letter);
                participant.turns_taken += 1;
                if !payload.hit {
                    participant.wrong_guess_count += 1;
                    if let Some(left) = participant.guesses_remaining.as_mut() {
                        *left = left.saturating_sub(1);
                    }
                }
                let remaining = participant.guesses_remaining;
                let name = self.name(payload.slot);
                let letter = payload.letter.to_ascii_uppercase();
                let line = match (payload.hit, remaining) {
                    (true, _) => format!("{name} guessed \"{letter}\" - Correct!"),
                    (false, Some(left)) => {
                        format!("{name} guessed \"{letter}\" - Wrong! {left} guesses remaining.")
                    }
                    (false, None) => format!("{name} guessed \"{letter}\" - Wrong!"),
                };
                self.narrate(time, line);
            }
            SessionEventKind::WordGuessed(payload) => {
                self.participants.get_mut(payload.slot).turns_taken += 1;
                let verdict = if payload.matched { "Correct!" } else { "Wrong!" };
                let line = format!(
                    "{} guessed the word \"{}\" - {verdict}",
                    self.name(payload.slot),
                    payload.guess.to_uppercase()
                );
                self.narrate(time, line);
            }
            SessionEventKind::WordResolved(payload) => {
                let solver = self.participants.get_mut(payload.solver);
                solver.score += payload.points;
                solver.guessed_letters.clear();
                solver.wrong_guess_count = 0;
                let owner = self.participants.get_mut(payload.solver.opponent());
                owner.remaining_words.retain(|word| *word != payload.word);
                owner.active_word.clone_from(&payload.next_active_word);
                let name = self.name(payload.solver);
                let word = payload.word.to_uppercase();
                let line = if payload.matched {
                    format!("{name} solved \"{word}\" for {} points!", payload.points)
                } else {
                    format!(
                        "{name} loses {} points. The word was \"{word}\".",
                        -payload.points
                    )
                };
                self.narrate(time, line);
            }
            SessionEventKind::OutcomeRecorded(payload) => {
                self.participants.get_mut(payload.slot).outcome = Some(payload.outcome);
                if matches!(self.settings.variant(), GameVariant::SingleWord { .. }) {
                    let name = self.name(payload.slot);
                    let line = match payload.outcome {
                        Outcome::Won => format!("{name} revealed the word!"),
                        Outcome::Lost => format!("{name} is out of the running."),
                    };
                    self.narrate(time, line);
                }
            }
            SessionEventKind::TieWindowOpened(payload) => {
                self.tie_break = TieBreak::AwaitingTie {
                    leader: payload.leader,
                };
                self.current_turn = Some(payload.challenger);
                let line = format!(
                    "{} finished first! {} is one letter away and gets one more turn to tie.",
                    self.name(payload.leader),
                    self.name(payload.challenger)
                );
                self.narrate(time, line);
            }
            SessionEventKind::TurnPassed(payload) => {
                self.current_turn = Some(payload.next_turn);
                let line = format!("{}, it's your turn!", self.name(payload.next_turn));
                self.narrate(time, line);
            }
            SessionEventKind::SessionFinished(payload) => {
                self.phase = Phase::Finished;
                self.current_turn = None;
                self.tie_break = TieBreak::Closed;
                self.result = Some(payload.result);
                let line = self.result_line(payload.result);
                self.narrate(time, line);
            }
            SessionEventKind::ParticipantLeft(payload) => {
                let line = format!("{} has left the game.", self.name(payload.slot));
                self.participants.get_mut(payload.slot).connection_id = None;
                self.narrate(time, line);
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

/// Draws one word uniformly at random.
fn draw_word(words: &[String], rng: &mut dyn DeterministicRng) -> Option<String> {
    let last = words.len().checked_sub(1)?;
    let upper = u32::try_from(last).unwrap_or(u32::MAX);
    let index = usize::try_from(rng.next_u32_range(0, upper)).map_or(last, |i| i.min(last));
    words.get(index).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wordclash_core::event::DomainEvent;
    use wordclash_test_support::{FixedClock, MockRng, SequenceRng};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn settings(variant: GameVariant) -> SessionSettings {
        SessionSettings::new(["Ashima".to_owned(), "Anjali".to_owned()], variant).unwrap()
    }

    fn multi(word_count: usize, turn_limit: u32) -> GameVariant {
        GameVariant::MultiWord {
            word_count,
            turn_limit,
        }
    }

    fn single() -> GameVariant {
        GameVariant::SingleWord { guess_budget: 6 }
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| (*w).to_owned()).collect()
    }

    struct Table {
        session: Session,
        a: Uuid,
        b: Uuid,
    }

    impl Table {
        fn letter(&mut self, who: Uuid, letter: &str) -> Result<Slot, DomainError> {
            self.session
                .guess_letter(who, letter, Uuid::new_v4(), &fixed_clock(), &mut MockRng)
        }

        fn word(&mut self, who: Uuid, word: &str) -> Result<Slot, DomainError> {
            self.session
                .guess_word(who, word, Uuid::new_v4(), &fixed_clock(), &mut MockRng)
        }
    }

    fn seated(variant: GameVariant) -> Table {
        let clock = fixed_clock();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut session =
            Session::open(Uuid::new_v4(), settings(variant), a, "Ashima", Uuid::new_v4(), &clock)
                .unwrap();
        session.join(b, "Anjali", Uuid::new_v4(), &clock).unwrap();
        Table { session, a, b }
    }

    /// A's words are guessed by B and vice versa. `MockRng` always draws the
    /// first remaining word.
    fn playing(variant: GameVariant, words_a: &[&str], words_b: &[&str]) -> Table {
        let clock = fixed_clock();
        let mut table = seated(variant);
        table
            .session
            .submit_words(table.a, &words(words_a), Uuid::new_v4(), &clock, &mut MockRng)
            .unwrap();
        table
            .session
            .submit_words(table.b, &words(words_b), Uuid::new_v4(), &clock, &mut MockRng)
            .unwrap();
        table.session.clear_uncommitted_events();
        table
    }

    // --- join ---

    #[test]
    fn test_open_seats_first_joiner_in_slot_a_and_waits() {
        let clock = fixed_clock();
        let connection = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();

        let session = Session::open(
            Uuid::new_v4(),
            settings(single()),
            connection,
            "Anjali",
            correlation_id,
            &clock,
        )
        .unwrap();

        assert_eq!(session.phase(), Phase::Waiting);
        assert_eq!(session.participants().slot_of(connection), Some(Slot::A));
        let events = session.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "session.participant_joined");
        let meta = events[0].metadata();
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.occurred_at, clock.0);
        assert_eq!(
            session.event_log()[0].text,
            "Anjali is here! Waiting for Ashima to join..."
        );
        assert_eq!(session.event_log()[0].source, REFEREE);
    }

    #[test]
    fn test_second_join_moves_to_setup() {
        let table = seated(single());
        assert_eq!(table.session.phase(), Phase::Setup);
        assert_eq!(table.session.participants().slot_of(table.b), Some(Slot::B));
        assert_eq!(
            table.session.participants().get(Slot::B).guesses_remaining,
            Some(6)
        );
    }

    #[test]
    fn test_join_rejects_unknown_names() {
        let result = Session::open(
            Uuid::new_v4(),
            settings(single()),
            Uuid::new_v4(),
            "Mallory",
            Uuid::new_v4(),
            &fixed_clock(),
        );
        match result {
            Err(DomainError::IdentityViolation(msg)) => {
                assert_eq!(msg, "only Ashima and Anjali can play this game");
            }
            other => panic!("expected IdentityViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_join_rejects_same_name_twice() {
        let clock = fixed_clock();
        let mut session = Session::open(
            Uuid::new_v4(),
            settings(single()),
            Uuid::new_v4(),
            "Ashima",
            Uuid::new_v4(),
            &clock,
        )
        .unwrap();

        let result = session.join(Uuid::new_v4(), "Ashima", Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::IdentityViolation(_))));
        assert_eq!(session.phase(), Phase::Waiting);
    }

    #[test]
    fn test_join_rejects_third_connection() {
        let mut table = seated(single());
        let result = table
            .session
            .join(Uuid::new_v4(), "Ashima", Uuid::new_v4(), &fixed_clock());
        match result {
            Err(DomainError::IdentityViolation(msg)) => assert!(msg.contains("full")),
            other => panic!("expected IdentityViolation, got {other:?}"),
        }
    }

    // --- setup ---

    #[test]
    fn test_submit_before_opponent_joins_is_phase_violation() {
        let clock = fixed_clock();
        let a = Uuid::new_v4();
        let mut session =
            Session::open(Uuid::new_v4(), settings(single()), a, "Ashima", Uuid::new_v4(), &clock)
                .unwrap();

        let result = session.submit_words(a, &words(&["apple"]), Uuid::new_v4(), &clock, &mut MockRng);

        assert!(matches!(result, Err(DomainError::PhaseViolation(_))));
    }

    #[test]
    fn test_submit_rejects_wrong_word_count() {
        let mut table = seated(multi(5, 20));
        let result = table.session.submit_words(
            table.a,
            &words(&["apple", "pear"]),
            Uuid::new_v4(),
            &fixed_clock(),
            &mut MockRng,
        );
        assert!(matches!(result, Err(DomainError::InputValidation(_))));
        assert!(!table.session.participants().get(Slot::A).has_submitted());
    }

    #[test]
    fn test_submit_twice_is_rejected() {
        let clock = fixed_clock();
        let mut table = seated(single());
        table
            .session
            .submit_words(table.a, &words(&["apple"]), Uuid::new_v4(), &clock, &mut MockRng)
            .unwrap();

        let result =
            table
                .session
                .submit_words(table.a, &words(&["mango"]), Uuid::new_v4(), &clock, &mut MockRng);

        assert!(matches!(result, Err(DomainError::InputValidation(_))));
        assert_eq!(table.session.participants().get(Slot::A).words, words(&["apple"]));
    }

    #[test]
    fn test_both_submissions_start_play_with_a_on_turn() {
        let clock = fixed_clock();
        let mut table = seated(multi(3, 20));
        let mut rng = SequenceRng::new(vec![2, 1]);
        table
            .session
            .submit_words(table.a, &words(&["Apple", "pear", "plum"]), Uuid::new_v4(), &clock, &mut rng)
            .unwrap();
        assert_eq!(table.session.phase(), Phase::Setup);

        table
            .session
            .submit_words(table.b, &words(&["lion", "tiger", "bear"]), Uuid::new_v4(), &clock, &mut rng)
            .unwrap();

        assert_eq!(table.session.phase(), Phase::Playing);
        assert_eq!(table.session.current_turn(), Some(Slot::A));
        let a = table.session.participants().get(Slot::A);
        assert_eq!(a.words, words(&["apple", "pear", "plum"]));
        assert_eq!(a.active_word.as_deref(), Some("plum"));
        let b = table.session.participants().get(Slot::B);
        assert_eq!(b.active_word.as_deref(), Some("tiger"));
        let types: Vec<&str> = table
            .session
            .uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect();
        assert_eq!(
            types,
            vec![
                "session.participant_joined",
                "session.participant_joined",
                "session.words_submitted",
                "session.words_submitted",
                "session.play_started",
            ]
        );
    }

    // --- turn engine preconditions ---

    #[test]
    fn test_guess_during_setup_is_phase_violation_even_for_strangers() {
        let mut table = seated(single());
        let result = table.letter(Uuid::new_v4(), "a");
        assert!(matches!(result, Err(DomainError::PhaseViolation(_))));
    }

    #[test]
    fn test_guess_from_stranger_is_identity_violation() {
        let mut table = playing(single(), &["dog"], &["cat"]);
        let result = table.letter(Uuid::new_v4(), "a");
        assert!(matches!(result, Err(DomainError::IdentityViolation(_))));
    }

    #[test]
    fn test_guess_out_of_turn_is_turn_violation() {
        let mut table = playing(single(), &["dog"], &["cat"]);
        let b = table.b;
        let result = table.letter(b, "a");
        assert!(matches!(result, Err(DomainError::TurnViolation(_))));
    }

    #[test]
    fn test_malformed_letter_is_rejected_without_mutation() {
        let mut table = playing(single(), &["dog"], &["cat"]);
        let a = table.a;
        let version = table.session.version();

        let result = table.letter(a, "ab");

        assert!(matches!(result, Err(DomainError::InputValidation(_))));
        assert_eq!(table.session.version(), version);
        assert!(table.session.uncommitted_events().is_empty());
    }

    #[test]
    fn test_repeated_letter_is_never_accepted_twice() {
        let mut table = playing(multi(2, 20), &["dog", "owl"], &["cat", "emu"]);
        let (a, b) = (table.a, table.b);
        table.letter(a, "x").unwrap();
        table.letter(b, "q").unwrap();
        let before = table.session.participants().get(Slot::A).clone();

        let result = table.letter(a, "X");

        match result {
            Err(DomainError::InputValidation(msg)) => assert_eq!(msg, "you already guessed \"X\""),
            other => panic!("expected InputValidation, got {other:?}"),
        }
        let after = table.session.participants().get(Slot::A);
        assert_eq!(after.guessed_letters, before.guessed_letters);
        assert_eq!(after.turns_taken, before.turns_taken);
        assert_eq!(table.session.current_turn(), Some(Slot::A));
    }

    // --- letter guesses and resolution ---

    #[test]
    fn test_miss_increments_wrong_count_and_passes_turn() {
        let mut table = playing(multi(2, 20), &["dog", "owl"], &["cat", "emu"]);
        let a = table.a;

        table.letter(a, "z").unwrap();

        let guesser = table.session.participants().get(Slot::A);
        assert_eq!(guesser.guessed_letters, vec!['z']);
        assert_eq!(guesser.wrong_guess_count, 1);
        assert_eq!(guesser.turns_taken, 1);
        assert_eq!(table.session.current_turn(), Some(Slot::B));
    }

    #[test]
    fn test_revealing_cat_scores_ten_and_rotates() {
        let mut table = playing(multi(2, 20), &["dog", "owl"], &["cat", "emu"]);
        let (a, b) = (table.a, table.b);

        table.letter(a, "c").unwrap();
        table.letter(b, "d").unwrap();
        table.letter(a, "a").unwrap();
        table.letter(b, "o").unwrap();
        table.letter(a, "t").unwrap();

        let solver = table.session.participants().get(Slot::A);
        assert_eq!(solver.score, 10);
        assert!(solver.guessed_letters.is_empty());
        assert_eq!(solver.wrong_guess_count, 0);
        let owner = table.session.participants().get(Slot::B);
        assert_eq!(owner.remaining_words, words(&["emu"]));
        assert_eq!(owner.active_word.as_deref(), Some("emu"));
        assert!(owner.remaining_words.iter().all(|w| owner.words.contains(w)));
    }

    #[test]
    fn test_resolution_subtracts_wrong_guesses() {
        let mut table = playing(multi(2, 20), &["dog", "owl"], &["cat", "emu"]);
        let (a, b) = (table.a, table.b);

        for (mine, theirs) in [("x", "q"), ("z", "j"), ("c", "k"), ("a", "v")] {
            table.letter(a, mine).unwrap();
            table.letter(b, theirs).unwrap();
        }
        table.letter(a, "t").unwrap();

        assert_eq!(table.session.participants().get(Slot::A).score, 10 - 2);
    }

    // --- whole-word guesses ---

    #[test]
    fn test_correct_word_guess_scores_and_rotates() {
        let mut table = playing(multi(2, 20), &["dog", "owl"], &["cat", "emu"]);
        let a = table.a;

        table.word(a, "  CAT ").unwrap();

        assert_eq!(table.session.participants().get(Slot::A).score, 10);
        assert_eq!(table.session.participants().get(Slot::A).turns_taken, 1);
        assert_eq!(
            table.session.participants().get(Slot::B).active_word.as_deref(),
            Some("emu")
        );
    }

    #[test]
    fn test_wrong_word_guess_deducts_penalty_and_still_rotates() {
        let mut table = playing(multi(2, 20), &["dog", "owl"], &["cat", "emu"]);
        let a = table.a;

        table.word(a, "cot").unwrap();

        let guesser = table.session.participants().get(Slot::A);
        assert_eq!(guesser.score, -10);
        assert_eq!(guesser.turns_taken, 1);
        let owner = table.session.participants().get(Slot::B);
        assert_eq!(owner.remaining_words, words(&["emu"]));
        assert_eq!(owner.active_word.as_deref(), Some("emu"));
        assert_eq!(table.session.current_turn(), Some(Slot::B));
    }

    #[test]
    fn test_empty_word_guess_is_input_validation() {
        let mut table = playing(multi(2, 20), &["dog", "owl"], &["cat", "emu"]);
        let a = table.a;
        assert!(matches!(table.word(a, "   "), Err(DomainError::InputValidation(_))));
    }

    // --- multi-word termination ---

    #[test]
    fn test_multi_word_waits_for_turn_parity_then_compares_scores() {
        let mut table = playing(multi(1, 20), &["dog"], &["cat"]);
        let (a, b) = (table.a, table.b);

        table.word(a, "cat").unwrap();
        assert_eq!(table.session.phase(), Phase::Playing);
        assert_eq!(table.session.current_turn(), Some(Slot::B));

        table.letter(b, "d").unwrap();

        assert_eq!(table.session.phase(), Phase::Finished);
        assert_eq!(table.session.result(), Some(SessionResult::Winner(Slot::A)));
        assert_eq!(table.session.current_turn(), None);
        assert_eq!(
            table.session.participants().get(Slot::A).outcome,
            Some(Outcome::Won)
        );
        assert_eq!(
            table.session.participants().get(Slot::B).outcome,
            Some(Outcome::Lost)
        );
        assert_eq!(
            table.session.event_log().last().unwrap().text,
            "Ashima wins with 10 points to 0!"
        );
    }

    #[test]
    fn test_multi_word_finishes_at_turn_limit() {
        let mut table = playing(multi(2, 2), &["dog", "owl"], &["cat", "emu"]);
        let (a, b) = (table.a, table.b);

        table.letter(a, "c").unwrap();
        table.letter(b, "d").unwrap();
        table.letter(a, "a").unwrap();
        assert_eq!(table.session.phase(), Phase::Playing);
        table.letter(b, "o").unwrap();

        assert_eq!(table.session.phase(), Phase::Finished);
        assert_eq!(table.session.result(), Some(SessionResult::Tie));
    }

    #[test]
    fn test_finished_session_rejects_guesses() {
        let mut table = playing(multi(1, 1), &["dog"], &["cat"]);
        let (a, b) = (table.a, table.b);
        table.letter(a, "c").unwrap();
        table.letter(b, "d").unwrap();
        assert_eq!(table.session.phase(), Phase::Finished);

        let result = table.letter(a, "a");

        assert!(matches!(result, Err(DomainError::PhaseViolation(_))));
    }

    // --- single-word termination ---

    #[test]
    fn test_single_word_bonus_turn_then_tie() {
        let mut table = playing(single(), &["dog"], &["cat"]);
        let (a, b) = (table.a, table.b);

        table.letter(a, "c").unwrap();
        table.letter(b, "d").unwrap();
        table.letter(a, "a").unwrap();
        table.letter(b, "o").unwrap();
        table.letter(a, "t").unwrap();

        assert_eq!(table.session.phase(), Phase::Playing);
        assert_eq!(
            table.session.tie_break(),
            TieBreak::AwaitingTie { leader: Slot::A }
        );
        assert_eq!(table.session.current_turn(), Some(Slot::B));

        table.letter(b, "g").unwrap();

        assert_eq!(table.session.phase(), Phase::Finished);
        assert_eq!(table.session.result(), Some(SessionResult::Tie));
        assert_eq!(table.session.tie_break(), TieBreak::Closed);
    }

    #[test]
    fn test_single_word_failed_bonus_turn_leaves_opener_winner() {
        let mut table = playing(single(), &["dog"], &["cat"]);
        let (a, b) = (table.a, table.b);

        table.letter(a, "c").unwrap();
        table.letter(b, "d").unwrap();
        table.letter(a, "a").unwrap();
        table.letter(b, "o").unwrap();
        table.letter(a, "t").unwrap();
        table.letter(b, "x").unwrap();

        assert_eq!(table.session.phase(), Phase::Finished);
        assert_eq!(table.session.result(), Some(SessionResult::Winner(Slot::A)));
        assert_eq!(
            table.session.participants().get(Slot::B).outcome,
            Some(Outcome::Lost)
        );
    }

    #[test]
    fn test_single_word_two_letters_left_ends_immediately() {
        let mut table = playing(single(), &["dog"], &["cat"]);
        let (a, b) = (table.a, table.b);

        table.letter(a, "c").unwrap();
        table.letter(b, "d").unwrap();
        table.letter(a, "a").unwrap();
        table.letter(b, "x").unwrap();
        table.letter(a, "t").unwrap();

        assert_eq!(table.session.phase(), Phase::Finished);
        assert_eq!(table.session.result(), Some(SessionResult::Winner(Slot::A)));
    }

    #[test]
    fn test_single_word_second_player_wins_outright() {
        let mut table = playing(single(), &["dog"], &["cat"]);
        let (a, b) = (table.a, table.b);

        table.letter(a, "x").unwrap();
        table.letter(b, "d").unwrap();
        table.letter(a, "c").unwrap();
        table.letter(b, "o").unwrap();
        table.letter(a, "a").unwrap();
        table.letter(b, "g").unwrap();

        assert_eq!(table.session.phase(), Phase::Finished);
        assert_eq!(table.session.result(), Some(SessionResult::Winner(Slot::B)));
        assert_eq!(
            table.session.participants().get(Slot::A).outcome,
            Some(Outcome::Lost)
        );
    }

    #[test]
    fn test_single_word_exhausted_budget_loses_and_play_continues() {
        let mut table = playing(GameVariant::SingleWord { guess_budget: 1 }, &["zzz"], &["hyena"]);
        let (a, b) = (table.a, table.b);

        table.letter(a, "q").unwrap();

        let loser = table.session.participants().get(Slot::A);
        assert_eq!(loser.guesses_remaining, Some(0));
        assert_eq!(loser.outcome, Some(Outcome::Lost));
        assert_eq!(table.session.phase(), Phase::Playing);
        assert_eq!(table.session.current_turn(), Some(Slot::B));

        table.letter(b, "z").unwrap();

        assert_eq!(table.session.phase(), Phase::Finished);
        assert_eq!(table.session.result(), Some(SessionResult::Winner(Slot::B)));
    }

    #[test]
    fn test_single_word_turn_stays_with_survivor() {
        let mut table = playing(GameVariant::SingleWord { guess_budget: 1 }, &["bird"], &["hyena"]);
        let (a, b) = (table.a, table.b);

        table.letter(a, "q").unwrap();
        table.letter(b, "b").unwrap();

        assert_eq!(table.session.current_turn(), Some(Slot::B));
        assert!(matches!(table.letter(a, "h"), Err(DomainError::TurnViolation(_))));
    }

    #[test]
    fn test_single_word_wrong_word_guess_loses() {
        let mut table = playing(single(), &["dog"], &["cat"]);
        let a = table.a;

        table.word(a, "cot").unwrap();

        let guesser = table.session.participants().get(Slot::A);
        assert_eq!(guesser.outcome, Some(Outcome::Lost));
        assert_eq!(guesser.score, -10);
        assert!(table.session.participants().get(Slot::B).remaining_words.is_empty());
        assert_eq!(table.session.current_turn(), Some(Slot::B));
    }

    // --- departure ---

    #[test]
    fn test_depart_narrates_and_frees_seat() {
        let mut table = seated(single());
        let b = table.b;

        let slot = table.session.depart(b, Uuid::new_v4(), &fixed_clock()).unwrap();

        assert_eq!(slot, Slot::B);
        assert_eq!(
            table.session.event_log().last().unwrap().text,
            "Anjali has left the game."
        );
        assert!(matches!(
            table.session.ensure_member(b),
            Err(DomainError::IdentityViolation(_))
        ));
    }

    #[test]
    fn test_sequence_numbers_follow_version() {
        let table = playing(single(), &["dog"], &["cat"]);
        assert_eq!(table.session.version(), 5);
        assert_eq!(table.session.event_log().len(), 6);
    }

    #[test]
    fn test_draw_word_clamps_out_of_range_values() {
        let mut rng = SequenceRng::new(vec![99]);
        assert_eq!(
            draw_word(&words(&["one", "two"]), &mut rng).as_deref(),
            Some("two")
        );
        assert_eq!(draw_word(&[], &mut MockRng), None);
    }
}
