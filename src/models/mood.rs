use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Mood labels offered by the mood picker, in display order.
pub const MOOD_LABELS: [&str; 10] = [
    "Happy",
    "Loved",
    "Excited",
    "Energetic",
    "Neutral",
    "Calm",
    "Sad",
    "Angry",
    "Tired",
    "Stressed",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: String,
    pub mood: String,
    pub note: String,
    pub date: NaiveDate,
}

/// One slot of a trailing day window: the day and the first mood logged on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodDay {
    pub date: NaiveDate,
    pub mood: Option<MoodEntry>,
}

/// Builds the last `days` days ending at `today`, oldest first.
pub fn mood_window(history: &[MoodEntry], today: NaiveDate, days: u32) -> Vec<MoodDay> {
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| MoodDay {
            date,
            mood: history.iter().find(|entry| entry.date == date).cloned(),
        })
        .collect()
}
