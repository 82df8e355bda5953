//! Keyword record model and its request/response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored keyword record. Every stored record carries exactly one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub id: String,
    pub username: String,
    pub channels: Vec<String>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub unavailable: bool,
    #[serde(default)]
    pub created: bool,
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request body for creating keywords, one per listed channel.
///
/// Every field is optional at the wire level so that missing values are
/// reported as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeywordRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub channels: Option<Vec<String>>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub unavailable: Option<bool>,
    #[serde(default)]
    pub created: Option<bool>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A validated create request, ready to be fanned out per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct NewKeywords {
    pub username: String,
    pub channels: Vec<String>,
    pub available: bool,
    pub unavailable: bool,
    pub created: bool,
    pub created_by: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewKeywords {
    /// Build the record stored for a single channel of the fan-out.
    pub fn record_for(&self, id: String, channel: &str) -> Keyword {
        Keyword {
            id,
            username: self.username.clone(),
            channels: vec![channel.to_string()],
            available: self.available,
            unavailable: self.unavailable,
            created: self.created,
            created_by: self.created_by.clone(),
            created_at: self.created_at,
        }
    }
}

/// One page of keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordPage {
    pub records: Vec<Keyword>,
    pub total_pages: u64,
}

/// Response body for a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedKeywords {
    pub message: String,
    pub created_records: Vec<Keyword>,
}

/// Plain confirmation body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
