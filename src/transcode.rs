//! Field identifier to column identifier transcoding.
//!
//! A record declares its fields as mixed-case words (`UserID`, `CreatedAt`);
//! the table stores them in lowercase with underscores (`user_id`,
//! `created_at`). The [`to_snake`] function performs that conversion and a
//! [`Transcoder`] carries the chosen strategy into each
//! [`RecordStore`](crate::store::RecordStore) explicitly, so two stores in
//! the same process can follow different naming conventions without any
//! shared mutable state.

/// Convert a mixed-case identifier into a lowercase, underscore-separated
/// column identifier.
///
/// A separator is inserted before an uppercase letter when the following
/// character exists and is lowercase, or when the preceding character is
/// lowercase. Every character is lowercased in the output. The function is
/// pure and total; empty input yields empty output.
///
/// `UserID` becomes `user_id` and `CreatedAt` becomes `created_at`. Pure
/// acronym runs only split at a lowercase/uppercase boundary, so
/// `HTTPServer` becomes `http_server` while `HTTPAPI` stays `httpapi`.
/// This is the canonical behavior; no acronym-aware splitting is attempted.
pub fn to_snake(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 2);
    for (i, c) in chars.iter().enumerate() {
        if i > 0
            && c.is_uppercase()
            && (chars.get(i + 1).is_some_and(|next| next.is_lowercase())
                || chars[i - 1].is_lowercase())
        {
            out.push('_');
        }
        for lowered in c.to_lowercase() {
            out.push(lowered);
        }
    }
    out
}

/// The naming strategy a store applies when deriving column names.
pub type NamingFn = fn(&str) -> String;

/// A field-name to column-name conversion strategy, passed to each store at
/// construction. The default strategy is [`to_snake`].
#[derive(Debug, Clone, Copy)]
pub struct Transcoder {
    naming: NamingFn,
}

impl Transcoder {
    /// The standard lowercase/underscore strategy.
    pub fn snake() -> Self {
        Self { naming: to_snake }
    }

    /// A caller-supplied strategy. The function must be pure: table metadata
    /// derived from it is cached per record type.
    pub fn custom(naming: NamingFn) -> Self {
        Self { naming }
    }

    /// Apply the strategy to one field identifier.
    pub fn transcode(&self, identifier: &str) -> String {
        (self.naming)(identifier)
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::snake()
    }
}
