//! Back-office language and its date format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Timestamp, ValidationError};

/// Language used by the admin, governing how dates are shown and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lang {
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "fr_FR")]
    FrFr,
    #[serde(rename = "es_ES")]
    EsEs,
    #[serde(rename = "it_IT")]
    ItIt,
    #[serde(rename = "de_DE")]
    DeDe,
}

impl Lang {
    pub const ALL: [Lang; 5] = [Lang::EnUs, Lang::FrFr, Lang::EsEs, Lang::ItIt, Lang::DeDe];

    /// Looks up a language by its locale code (`en_US`, `fr-FR`, ...).
    pub fn from_code(code: &str) -> Option<Lang> {
        let normalized = code.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(&normalized))
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::EnUs => "en_US",
            Lang::FrFr => "fr_FR",
            Lang::EsEs => "es_ES",
            Lang::ItIt => "it_IT",
            Lang::DeDe => "de_DE",
        }
    }

    /// strftime pattern for dates in this language.
    pub fn date_format(&self) -> &'static str {
        match self {
            Lang::EnUs => "%m/%d/%Y",
            Lang::FrFr | Lang::EsEs | Lang::ItIt => "%d/%m/%Y",
            Lang::DeDe => "%d.%m.%Y",
        }
    }

    /// Formats the calendar day of `ts` in this language's format.
    pub fn format_date(&self, ts: &Timestamp) -> String {
        ts.format(self.date_format())
    }

    /// Parses a date written in this language's format.
    ///
    /// The result is midnight UTC of the given day.
    pub fn parse_date(&self, field: &str, raw: &str) -> Result<Timestamp, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::empty_field(field));
        }
        NaiveDate::parse_from_str(raw, self.date_format())
            .map(Timestamp::start_of_day)
            .map_err(|_| {
                ValidationError::invalid_format(
                    field,
                    format!("expected a date like {}", self.example_date()),
                )
            })
    }

    fn example_date(&self) -> String {
        NaiveDate::from_ymd_opt(2031, 12, 24)
            .map(|d| d.format(self.date_format()).to_string())
            .unwrap_or_default()
    }
}

impl Default for Lang {
    fn default() -> Self {
        Lang::EnUs
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
