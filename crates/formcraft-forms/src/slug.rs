//! Slug value object
//!
//! The URL-safe public address of a published form. Lowercase
//! alphanumerics and hyphens only; uniqueness is the repository's
//! concern, handled by the form service with bounded retries.

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validated slug.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Parse and validate a slug.
    pub fn parse(value: impl Into<String>) -> Result<Self, SlugError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SlugError::Empty);
        }
        // Same charset the public router accepts.
        let pattern = Regex::new("^[a-z0-9-]+$").expect("valid slug pattern");
        if !pattern.is_match(&value) {
            return Err(SlugError::InvalidFormat);
        }
        Ok(Self(value))
    }

    /// Derive a slug candidate from a form title: lowercase, with every
    /// run of non-alphanumerics collapsed to a single hyphen. Always
    /// yields a valid slug; an all-symbol title falls back to "form".
    pub fn candidate(title: &str) -> Slug {
        let mut out = String::with_capacity(title.len());
        let mut pending_hyphen = false;
        for ch in title.to_lowercase().chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_hyphen && !out.is_empty() {
                    out.push('-');
                }
                pending_hyphen = false;
                out.push(ch);
            } else {
                pending_hyphen = true;
            }
        }
        if out.is_empty() {
            out.push_str("form");
        }
        Slug(out)
    }

    /// A copy of this slug with a short random disambiguating suffix.
    pub fn disambiguated(&self) -> Slug {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        Slug(format!("{}-{suffix}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    Empty,
    InvalidFormat,
}

impl std::error::Error for SlugError {}

impl fmt::Display for SlugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Slug cannot be empty"),
            Self::InvalidFormat => {
                write!(f, "Slug may only contain lowercase letters, digits and hyphens")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_valid_slugs() {
        assert!(Slug::parse("customer-feedback-2024").is_ok());
        assert!(Slug::parse("a").is_ok());
    }

    #[test]
    fn parse_rejects_bad_slugs() {
        assert_eq!(Slug::parse("").unwrap_err(), SlugError::Empty);
        assert_eq!(
            Slug::parse("Hello World").unwrap_err(),
            SlugError::InvalidFormat
        );
        assert_eq!(Slug::parse("café").unwrap_err(), SlugError::InvalidFormat);
    }

    #[test]
    fn candidate_collapses_runs() {
        assert_eq!(Slug::candidate("Customer Feedback!").as_str(), "customer-feedback");
        assert_eq!(Slug::candidate("  A -- B  ").as_str(), "a-b");
        assert_eq!(Slug::candidate("2024 Survey").as_str(), "2024-survey");
    }

    #[test]
    fn candidate_never_empty() {
        assert_eq!(Slug::candidate("!!!").as_str(), "form");
    }

    #[test]
    fn disambiguated_candidate_still_parses() {
        let slug = Slug::candidate("Customer Feedback").disambiguated();
        assert!(slug.as_str().starts_with("customer-feedback-"));
        assert!(Slug::parse(slug.as_str()).is_ok());
    }
}
