//! Rules a session is created with.

use serde::Serialize;
use wordclash_core::error::DomainError;

/// Which termination rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameVariant {
    /// One secret word each and a budget of wrong letter guesses.
    SingleWord {
        /// Wrong letter guesses allowed per participant.
        guess_budget: u32,
    },
    /// Several secret words each, scored, with a shared turn limit.
    MultiWord {
        /// Words each participant submits.
        word_count: usize,
        /// Guesses each participant may make.
        turn_limit: u32,
    },
}

impl GameVariant {
    /// Number of secret words each participant submits.
    #[must_use]
    pub fn word_count(&self) -> usize {
        match self {
            Self::SingleWord { .. } => 1,
            Self::MultiWord { word_count, .. } => *word_count,
        }
    }

    /// Turn limit, if the variant has one.
    #[must_use]
    pub fn turn_limit(&self) -> Option<u32> {
        match self {
            Self::SingleWord { .. } => None,
            Self::MultiWord { turn_limit, .. } => Some(*turn_limit),
        }
    }

    /// Initial guess budget, if the variant has one.
    #[must_use]
    pub fn guess_budget(&self) -> Option<u32> {
        match self {
            Self::SingleWord { guess_budget } => Some(*guess_budget),
            Self::MultiWord { .. } => None,
        }
    }
}

/// The two allowed identities and the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    allowed_names: [String; 2],
    variant: GameVariant,
}

impl SessionSettings {
    /// Validates and builds settings.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InputValidation` if the names are blank or equal,
    /// or the variant has a zero count, limit, or budget.
    pub fn new(allowed_names: [String; 2], variant: GameVariant) -> Result<Self, DomainError> {
        let [first, second] = &allowed_names;
        if first.trim().is_empty() || second.trim().is_empty() {
            return Err(DomainError::InputValidation(
                "participant names must not be blank".to_owned(),
            ));
        }
        if first == second {
            return Err(DomainError::InputValidation(
                "the two participant names must differ".to_owned(),
            ));
        }
        let valid = match variant {
            GameVariant::SingleWord { guess_budget } => guess_budget > 0,
            GameVariant::MultiWord {
                word_count,
                turn_limit,
            } => word_count > 0 && turn_limit > 0,
        };
        if !valid {
            return Err(DomainError::InputValidation(
                "word count, turn limit and guess budget must be positive".to_owned(),
            ));
        }
        Ok(Self {
            allowed_names,
            variant,
        })
    }

    /// The two identities allowed to join.
    #[must_use]
    pub fn allowed_names(&self) -> &[String; 2] {
        &self.allowed_names
    }

    /// Returns `true` if `name` is one of the allowed identities.
    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        self.allowed_names.iter().any(|allowed| allowed == name)
    }

    /// The game variant.
    #[must_use]
    pub fn variant(&self) -> GameVariant {
        self.variant
    }
}
