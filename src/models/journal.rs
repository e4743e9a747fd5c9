use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A journal page. Stickers are ordered tags (the picker stores its color token)
/// and may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub content: String,
    pub stickers: Vec<String>,
    pub date: NaiveDate,
    pub is_draft: bool,
}
