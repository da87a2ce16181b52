//! Normalization of submitted words and guesses.

use wordclash_core::error::DomainError;

/// Shortest secret word accepted at setup.
pub const MIN_WORD_LEN: usize = 3;

/// Lower-cases and trims a candidate secret word, then checks it is at least
/// `MIN_WORD_LEN` letters of `a-z`.
///
/// # Errors
///
/// Returns `DomainError::InputValidation` describing the first failed rule.
pub fn normalize_word(raw: &str) -> Result<String, DomainError> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() {
        return Err(DomainError::InputValidation("word must not be empty".to_owned()));
    }
    if !word.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(DomainError::InputValidation(format!(
            "\"{}\" must contain letters a-z only",
            raw.trim()
        )));
    }
    if word.len() < MIN_WORD_LEN {
        return Err(DomainError::InputValidation(format!(
            "\"{word}\" is too short; words need at least {MIN_WORD_LEN} letters"
        )));
    }
    Ok(word)
}

/// Normalizes a whole setup batch and rejects duplicates.
///
/// # Errors
///
/// Returns `DomainError::InputValidation` if the batch has the wrong size,
/// any word is malformed, or two words coincide after normalization.
pub fn normalize_batch(raw_words: &[String], expected: usize) -> Result<Vec<String>, DomainError> {
    if raw_words.len() != expected {
        return Err(DomainError::InputValidation(format!(
            "expected {expected} word(s), got {}",
            raw_words.len()
        )));
    }

    let mut words: Vec<String> = Vec::with_capacity(expected);
    for raw in raw_words {
        let word = normalize_word(raw)?;
        if words.contains(&word) {
            return Err(DomainError::InputValidation(format!(
                "\"{word}\" was entered more than once"
            )));
        }
        words.push(word);
    }
    Ok(words)
}

/// Parses a letter guess: a single alphabetic character, case-insensitive.
///
/// # Errors
///
/// Returns `DomainError::InputValidation` for anything else.
pub fn normalize_letter(raw: &str) -> Result<char, DomainError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_lowercase()),
        _ => Err(DomainError::InputValidation(
            "guess a single letter (a-z)".to_owned(),
        )),
    }
}

/// Normalizes a whole-word guess for comparison.
///
/// # Errors
///
/// Returns `DomainError::InputValidation` if the guess is empty or contains
/// anything but letters.
pub fn normalize_guess(raw: &str) -> Result<String, DomainError> {
    let guess = raw.trim().to_lowercase();
    if guess.is_empty() || !guess.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(DomainError::InputValidation(
            "a word guess must contain letters a-z only".to_owned(),
        ));
    }
    Ok(guess)
}
