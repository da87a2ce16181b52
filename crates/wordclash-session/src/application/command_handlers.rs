//! Command handlers for the Session context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load the live session, execute the command,
//! save it, and broadcast the new snapshot. Rejections are reported to the
//! offending connection as a private notice and returned to the caller.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use wordclash_core::aggregate::AggregateRoot;
use wordclash_core::broadcast::Broadcaster;
use wordclash_core::clock::Clock;
use wordclash_core::error::DomainError;
use wordclash_core::event::DomainEvent;
use wordclash_core::repository::SessionRepository;
use wordclash_core::rng::DeterministicRng;
use wordclash_core::validator::{WordValidator, WordVerdict};

use crate::application::messages::{self, Action};
use crate::application::query_handlers::SessionView;
use crate::domain::aggregates::Session;
use crate::domain::commands::{
    Disconnect, GuessLetter, GuessWord, JoinSession, ResetSession, SubmitWords,
};
use crate::domain::events::{SessionEvent, SessionEventKind};
use crate::domain::participant::Slot;
use crate::domain::settings::SessionSettings;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct SessionCommandResult {
    /// The session affected or created by the command.
    pub session_id: Uuid,
    /// Seat of the connection that issued the command.
    pub slot: Slot,
    /// The events produced and committed.
    pub events: Vec<SessionEvent>,
}

/// Reports a rejection to the offending connection and hands it back.
fn reject(
    broadcaster: &dyn Broadcaster,
    connection_id: Uuid,
    action: Action,
    err: DomainError,
) -> DomainError {
    if err.is_rejection() {
        warn!(%connection_id, code = err.code(), ?action, "action rejected: {err}");
    } else {
        error!(%connection_id, ?action, "action failed: {err}");
    }
    if let Some(notice) = messages::rejection_notice(connection_id, action, &err) {
        broadcaster.send(notice);
    }
    err
}

async fn load_live(repo: &dyn SessionRepository<Session>) -> Result<Session, DomainError> {
    repo.load()
        .await?
        .ok_or_else(|| DomainError::PhaseViolation("no game is running; join first".to_owned()))
}

fn lock_rng(
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<MutexGuard<'_, dyn DeterministicRng + Send + 'static>, DomainError> {
    rng.lock()
        .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))
}

/// Saves the session and broadcasts the new snapshot. Returns the events
/// that were committed.
async fn commit(
    mut session: Session,
    repo: &dyn SessionRepository<Session>,
    broadcaster: &dyn Broadcaster,
) -> Result<Vec<SessionEvent>, DomainError> {
    let events = session.uncommitted_events().to_vec();
    session.clear_uncommitted_events();
    for event in &events {
        debug!(
            event_type = event.event_type(),
            sequence_number = event.metadata().sequence_number,
            payload = %event.to_payload(),
            "event committed"
        );
    }
    let view = SessionView::from_session(&session);
    repo.save(session).await?;
    broadcaster.send(messages::session_state(&view));
    Ok(events)
}

/// Handles the `JoinSession` command: seats the connection in the live
/// session, creating one if none exists, and tells the joiner its slot.
///
/// # Errors
///
/// Returns `DomainError::IdentityViolation` if the name may not join or the
/// session is full, and `DomainError::Infrastructure` if the repository
/// fails.
#[instrument(skip_all, fields(connection_id = %command.connection_id, player = %command.player_name))]
pub async fn handle_join(
    command: &JoinSession,
    settings: &SessionSettings,
    clock: &dyn Clock,
    repo: &dyn SessionRepository<Session>,
    broadcaster: &dyn Broadcaster,
) -> Result<SessionCommandResult, DomainError> {
    let joined = match repo.load().await? {
        Some(mut session) => session
            .join(
                command.connection_id,
                &command.player_name,
                command.correlation_id,
                clock,
            )
            .map(|slot| (session, slot)),
        None => Session::open(
            Uuid::new_v4(),
            settings.clone(),
            command.connection_id,
            &command.player_name,
            command.correlation_id,
            clock,
        )
        .map(|session| (session, Slot::A)),
    };
    let (session, slot) =
        joined.map_err(|e| reject(broadcaster, command.connection_id, Action::Join, e))?;
    let session_id = session.id;
    let name = session.participants().get(slot).display_name();
    info!(%session_id, ?slot, phase = ?session.phase(), "participant joined");

    let events = commit(session, repo, broadcaster).await?;
    broadcaster.send(messages::your_slot(command.connection_id, slot, &name));

    Ok(SessionCommandResult {
        session_id,
        slot,
        events,
    })
}

/// Handles the `SubmitWords` command: checks the batch, asks the dictionary
/// about every word, then commits the words to the reloaded session.
///
/// No session state is held across the dictionary lookups. A lookup that
/// fails to complete accepts the word.
///
/// # Errors
///
/// Returns `PhaseViolation`, `IdentityViolation` or `InputValidation` for an
/// unacceptable submission, `WordRejected` if the dictionary refuses a word,
/// and `Infrastructure` for repository or RNG failures.
#[instrument(skip_all, fields(connection_id = %command.connection_id))]
pub async fn handle_submit_words(
    command: &SubmitWords,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository<Session>,
    validator: &dyn WordValidator,
    broadcaster: &dyn Broadcaster,
) -> Result<SessionCommandResult, DomainError> {
    let rejected = |e| reject(broadcaster, command.connection_id, Action::SubmitWords, e);

    let (_, words) = load_live(repo)
        .await
        .and_then(|session| session.prepare_submission(command.connection_id, &command.words))
        .map_err(rejected)?;

    for word in &words {
        match validator.lookup(word).await {
            Ok(WordVerdict::Accepted) => debug!(word = %word, "dictionary accepted word"),
            Ok(WordVerdict::Rejected) => {
                return Err(rejected(DomainError::WordRejected(format!(
                    "\"{word}\" is not a valid word"
                ))));
            }
            Err(err) => warn!(word = %word, "accepting word without validation: {err}"),
        }
    }

    let mut session = load_live(repo).await.map_err(rejected)?;
    let slot = {
        let mut rng_guard = lock_rng(rng).map_err(rejected)?;
        session
            .submit_words(
                command.connection_id,
                &words,
                command.correlation_id,
                clock,
                &mut *rng_guard,
            )
            .map_err(rejected)?
    };
    let session_id = session.id;
    info!(%session_id, ?slot, phase = ?session.phase(), "words submitted");

    let events = commit(session, repo, broadcaster).await?;
    Ok(SessionCommandResult {
        session_id,
        slot,
        events,
    })
}

/// Handles the `GuessLetter` command.
///
/// # Errors
///
/// Returns the rejection raised by the turn engine, or `Infrastructure` for
/// repository or RNG failures.
#[instrument(skip_all, fields(connection_id = %command.connection_id, letter = %command.letter))]
pub async fn handle_guess_letter(
    command: &GuessLetter,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository<Session>,
    broadcaster: &dyn Broadcaster,
) -> Result<SessionCommandResult, DomainError> {
    let rejected = |e| reject(broadcaster, command.connection_id, Action::Guess, e);

    let mut session = load_live(repo).await.map_err(rejected)?;
    // Lock RNG only for the synchronous domain method, never across an await.
    let slot = {
        let mut rng_guard = lock_rng(rng).map_err(rejected)?;
        session
            .guess_letter(
                command.connection_id,
                &command.letter,
                command.correlation_id,
                clock,
                &mut *rng_guard,
            )
            .map_err(rejected)?
    };
    let session_id = session.id;
    info!(%session_id, ?slot, next = ?session.current_turn(), "letter guessed");

    let events = commit(session, repo, broadcaster).await?;
    Ok(SessionCommandResult {
        session_id,
        slot,
        events,
    })
}

/// Handles the `GuessWord` command and sends the guesser private feedback.
///
/// # Errors
///
/// Returns the rejection raised by the turn engine, or `Infrastructure` for
/// repository or RNG failures.
#[instrument(skip_all, fields(connection_id = %command.connection_id))]
pub async fn handle_guess_word(
    command: &GuessWord,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository<Session>,
    broadcaster: &dyn Broadcaster,
) -> Result<SessionCommandResult, DomainError> {
    let rejected = |e| reject(broadcaster, command.connection_id, Action::Guess, e);

    let mut session = load_live(repo).await.map_err(rejected)?;
    let slot = {
        let mut rng_guard = lock_rng(rng).map_err(rejected)?;
        session
            .guess_word(
                command.connection_id,
                &command.word,
                command.correlation_id,
                clock,
                &mut *rng_guard,
            )
            .map_err(rejected)?
    };
    let session_id = session.id;
    info!(%session_id, ?slot, next = ?session.current_turn(), "word guessed");

    let events = commit(session, repo, broadcaster).await?;

    let guessed = events.iter().find_map(|event| match &event.kind {
        SessionEventKind::WordGuessed(payload) => Some(payload),
        _ => None,
    });
    let resolved = events.iter().find_map(|event| match &event.kind {
        SessionEventKind::WordResolved(payload) => Some(payload),
        _ => None,
    });
    if let (Some(guessed), Some(resolved)) = (guessed, resolved) {
        broadcaster.send(messages::word_guess_feedback(
            command.connection_id,
            guessed,
            resolved,
        ));
    }

    Ok(SessionCommandResult {
        session_id,
        slot,
        events,
    })
}

/// Handles the `ResetSession` command: discards the live session and tells
/// everyone.
///
/// # Errors
///
/// Returns `PhaseViolation` without a live session, `IdentityViolation` if
/// the caller is not a participant, and `Infrastructure` if the repository
/// fails.
#[instrument(skip_all, fields(connection_id = %command.connection_id))]
pub async fn handle_reset(
    command: &ResetSession,
    repo: &dyn SessionRepository<Session>,
    broadcaster: &dyn Broadcaster,
) -> Result<SessionCommandResult, DomainError> {
    let rejected = |e| reject(broadcaster, command.connection_id, Action::Reset, e);

    let session = load_live(repo).await.map_err(rejected)?;
    let slot = session
        .ensure_member(command.connection_id)
        .map_err(rejected)?;
    let name = session.participants().get(slot).display_name();

    repo.clear().await?;
    info!(session_id = %session.id, ?slot, "session reset");
    broadcaster.send(messages::session_reset(&name));

    Ok(SessionCommandResult {
        session_id: session.id,
        slot,
        events: Vec::new(),
    })
}

/// Handles the `Disconnect` notification: a seated participant leaving
/// destroys the session. Connections without a seat are ignored and yield
/// `None`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
#[instrument(skip_all, fields(connection_id = %command.connection_id))]
pub async fn handle_disconnect(
    command: &Disconnect,
    clock: &dyn Clock,
    repo: &dyn SessionRepository<Session>,
    broadcaster: &dyn Broadcaster,
) -> Result<Option<SessionCommandResult>, DomainError> {
    let Some(mut session) = repo.load().await? else {
        debug!("disconnect without a live session");
        return Ok(None);
    };
    if session.ensure_member(command.connection_id).is_err() {
        debug!("disconnect from a connection without a seat");
        return Ok(None);
    }

    let slot = session.depart(command.connection_id, command.correlation_id, clock)?;
    let name = session.participants().get(slot).display_name();
    let events = session.uncommitted_events().to_vec();

    repo.clear().await?;
    info!(session_id = %session.id, ?slot, "participant left; session discarded");
    broadcaster.send(messages::participant_left(slot, &name));

    Ok(Some(SessionCommandResult {
        session_id: session.id,
        slot,
        events,
    }))
}
