//! Human-readable order references.

use serde::{Deserialize, Serialize};

/// First folio number handed out by a fresh installation.
pub const FOLIO_BASE: u64 = 14043;

/// Prefix carried by every folio.
pub const FOLIO_PREFIX: &str = "FO-";

/// Sequential order reference, assigned only at confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Folio(String);

impl Folio {
    pub fn from_number(n: u64) -> Self {
        Self(format!("{FOLIO_PREFIX}{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix of the folio, if one can be extracted.
    ///
    /// Strips every non-digit character, so legacy folios with odd prefixes
    /// still parse.
    pub fn number(&self) -> Option<u64> {
        let digits: String = self.0.chars().filter(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

impl core::fmt::Display for Folio {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Folio {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Number the sequence should hand out next, given the latest assigned folio.
///
/// Unparseable folios fall back to [`FOLIO_BASE`]. Used only to seed the
/// dedicated counter when hydrating a store from existing data; the live
/// sequence never re-derives from order rows.
pub fn next_number_after(latest: Option<&Folio>) -> u64 {
    match latest.and_then(Folio::number) {
        Some(n) => n + 1,
        None => FOLIO_BASE,
    }
}
