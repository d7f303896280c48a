//! Paper records as they flow through the pipeline
//!
//! `RawRecord` is the producer's shape: every core field is optional so that
//! validation can name the missing field and the record's position. `Paper`
//! is the validated form that the classifier tags and the graph builder reads.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Venue used when the enrichment collaborator supplied none
pub const DEFAULT_VENUE: &str = "arXiv";

/// Structural errors on a single paper record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record #{position} ({id}): missing required field `{field}`")]
    MissingField {
        position: usize,
        id: String,
        field: &'static str,
    },

    #[error("record #{position} ({id}): invalid field `{field}`: {reason}")]
    InvalidField {
        position: usize,
        id: String,
        field: &'static str,
        reason: String,
    },

    #[error("record #{position}: malformed record: {reason}")]
    Malformed { position: usize, reason: String },
}

impl RecordError {
    /// Position of the offending record in its input sequence
    pub fn position(&self) -> usize {
        match self {
            Self::MissingField { position, .. }
            | Self::InvalidField { position, .. }
            | Self::Malformed { position, .. } => *position,
        }
    }
}

/// A paper record as emitted by the fetch collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(
        default,
        rename = "arxiv_id",
        alias = "id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_link: Option<String>,
    /// Fields owned by other collaborators, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRecord {
    /// Decode one element of a JSON record array, reporting its position on failure
    pub fn from_value(position: usize, value: Value) -> Result<Self, RecordError> {
        serde_json::from_value(value).map_err(|e| RecordError::Malformed {
            position,
            reason: e.to_string(),
        })
    }

    /// Validate the record, producing an untagged `Paper`
    pub fn validate(self, position: usize) -> Result<Paper, RecordError> {
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            Some(_) => {
                return Err(RecordError::InvalidField {
                    position,
                    id: "<blank>".to_string(),
                    field: "arxiv_id",
                    reason: "identifier is blank".to_string(),
                })
            }
            None => {
                return Err(RecordError::MissingField {
                    position,
                    id: "<unknown>".to_string(),
                    field: "arxiv_id",
                })
            }
        };

        let missing = |field: &'static str| RecordError::MissingField {
            position,
            id: id.clone(),
            field,
        };

        let title = self.title.ok_or_else(|| missing("title"))?;
        let abstract_text = self.abstract_text.ok_or_else(|| missing("abstract"))?;
        let authors = self.authors.ok_or_else(|| missing("authors"))?;
        let published_date = self.published_date.ok_or_else(|| missing("published_date"))?;
        let pdf_link = self.pdf_link.ok_or_else(|| missing("pdf_link"))?;

        if let Some(index) = authors.iter().position(|a| a.trim().is_empty()) {
            return Err(RecordError::InvalidField {
                position,
                id,
                field: "authors",
                reason: format!("author #{} is blank", index),
            });
        }

        if let Err(reason) = parse_publication_date(&published_date) {
            return Err(RecordError::InvalidField {
                position,
                id,
                field: "published_date",
                reason,
            });
        }

        let mut extra = self.extra;
        // Tags belong to the classifier; a raw copy would shadow them on reload
        for key in CLASSIFICATION_KEYS {
            extra.remove(key);
        }

        let invalid = |field: &'static str, e: serde_json::Error| RecordError::InvalidField {
            position,
            id: id.clone(),
            field,
            reason: e.to_string(),
        };
        let citation_count = match extra.remove("citation_count") {
            Some(value) => serde_json::from_value(value).map_err(|e| invalid("citation_count", e))?,
            None => None,
        };
        let venue = match extra.remove("venue") {
            Some(value) => serde_json::from_value(value).map_err(|e| invalid("venue", e))?,
            None => None,
        };
        let year = match extra.remove("year") {
            Some(value) => string_or_number(value).map_err(|e| invalid("year", e))?,
            None => None,
        };

        Ok(Paper {
            id,
            title,
            abstract_text,
            authors,
            published_date,
            pdf_link,
            domain: None,
            techniques: None,
            representations: None,
            citation_count,
            venue,
            year,
            extra,
        })
    }
}

/// Keys owned by the classifier; never carried through from raw input
const CLASSIFICATION_KEYS: [&str; 3] = ["domain", "techniques", "representations"];

/// Parse an ISO calendar date, optionally followed by a time component
pub fn parse_publication_date(raw: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| format!("'{}' is not an ISO date", raw))
}

/// A validated paper record
///
/// Classification fields are filled by the classifier; enrichment fields by
/// the citation collaborator. Both serialize flat, next to the core fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(rename = "arxiv_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub published_date: String,
    pub pdf_link: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub techniques: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representations: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The tags the classifier attaches to an accepted paper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub domain: String,
    pub techniques: Vec<String>,
    pub representations: Vec<String>,
}

impl Paper {
    /// Concatenated, lower-cased title and abstract used for keyword matching
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.abstract_text).to_lowercase()
    }

    /// Attach classifier tags
    pub fn tag(&mut self, classification: Classification) {
        for key in CLASSIFICATION_KEYS {
            self.extra.remove(key);
        }
        self.domain = Some(classification.domain);
        self.techniques = Some(classification.techniques);
        self.representations = Some(classification.representations);
    }

    /// Whether all three classification fields are present
    pub fn is_tagged(&self) -> bool {
        self.domain.is_some() && self.techniques.is_some() && self.representations.is_some()
    }

    pub fn citation_count(&self) -> u64 {
        self.citation_count.unwrap_or(0)
    }

    pub fn venue(&self) -> &str {
        self.venue.as_deref().unwrap_or(DEFAULT_VENUE)
    }

    /// Publication year, derived from the publication date when not enriched
    pub fn year(&self) -> String {
        match &self.year {
            Some(year) => year.clone(),
            None => self.published_date.chars().take(4).collect(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a year string or number, got {}",
            other
        ))),
    }
}
