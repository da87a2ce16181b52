//! Letter weights and word arithmetic.

/// Tile weight of each letter `a..=z`.
const LETTER_VALUES: [i64; 26] = [
    1, 3, 3, 2, 1, 4, 2, 4, 1, 8, 5, 1, 3, 1, 1, 3, 10, 1, 1, 1, 1, 4, 4, 8, 4, 10,
];

/// Weight of a single letter, case-insensitive. Non-letters weigh nothing.
#[must_use]
pub fn letter_value(letter: char) -> i64 {
    let lower = letter.to_ascii_lowercase();
    if lower.is_ascii_lowercase() {
        LETTER_VALUES[(lower as u8 - b'a') as usize]
    } else {
        0
    }
}

/// Sum of letter weights over every letter occurrence of `word`.
#[must_use]
pub fn word_value(word: &str) -> i64 {
    word.chars().map(letter_value).sum()
}

/// Points awarded for resolving `word` after `wrong_guesses` misses.
#[must_use]
pub fn resolution_points(word: &str, wrong_guesses: u32) -> i64 {
    word_value(word) * 2 - i64::from(wrong_guesses)
}

/// Points deducted for a wrong whole-word guess against `word`.
#[must_use]
pub fn wrong_guess_penalty(word: &str) -> i64 {
    word_value(word) * 2
}

/// Number of distinct letters of `word` not yet in `guessed`.
#[must_use]
pub fn letters_remaining(word: &str, guessed: &[char]) -> usize {
    let mut missing: Vec<char> = word
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| !guessed.contains(c))
        .collect();
    missing.sort_unstable();
    missing.dedup();
    missing.len()
}

/// Returns `true` when every distinct letter of `word` has been guessed.
#[must_use]
pub fn is_revealed(word: &str, guessed: &[char]) -> bool {
    letters_remaining(word, guessed) == 0
}
