//! Chirp body validation and profanity masking.

/// Maximum chirp length, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Words masked out of every chirp.
pub const PROFANE_WORDS: &[&str] = &["kerfuffle", "sharbert", "fornax"];

const MASK: &str = "****";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChirpError {
    #[error("Chirp body cannot be empty")]
    Empty,
    #[error("Chirp is too long, max {MAX_CHIRP_LENGTH} characters")]
    TooLong,
}

/// Validate a chirp body and return the cleaned version.
pub fn validate_chirp(body: &str) -> Result<String, ChirpError> {
    if body.is_empty() {
        return Err(ChirpError::Empty);
    }
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ChirpError::TooLong);
    }
    Ok(clean_body(body, PROFANE_WORDS))
}

/// Replace the lower-case, upper-case and title-case forms of each word with `****`.
pub fn clean_body(body: &str, words: &[&str]) -> String {
    words.iter().fold(body.to_string(), |cleaned, word| {
        let lower = word.to_lowercase();
        let upper = word.to_uppercase();
        cleaned
            .replace(&title_case(&lower), MASK)
            .replace(&lower, MASK)
            .replace(&upper, MASK)
    })
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
