//! Language utilities for the dictionary language pair
//!
//! The dictionary service expects ISO 639-1 (2-letter) codes joined with a
//! dash, e.g. "en-ru". Users may configure 3-letter codes as well.

use anyhow::{Result, anyhow};
use isolang::Language;

/// Resolve a 2- or 3-letter code to a known language
pub fn parse_language(code: &str) -> Result<Language> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => Language::from_639_3(&normalized_code),
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1
pub fn normalize_to_part1(code: &str) -> Result<String> {
    let language = parse_language(code)?;
    language
        .to_639_1()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Language has no 2-letter code: {}", code))
}

/// English name of a language code
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(parse_language(code)?.to_name().to_string())
}

/// Dictionary direction string such as "en-ru"
pub fn lookup_direction(source: &str, target: &str) -> Result<String> {
    Ok(format!(
        "{}-{}",
        normalize_to_part1(source)?,
        normalize_to_part1(target)?
    ))
}
