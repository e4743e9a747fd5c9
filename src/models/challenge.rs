//! Self-care challenges.
//!
//! The set of challenges is fixed at compile time. Only per-challenge progress
//! is stored; titles and targets come from [`CHALLENGES`].

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Points earned per unit of challenge progress.
pub const POINTS_PER_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDefinition {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub max_progress: u32,
}

pub const CHALLENGES: [ChallengeDefinition; 5] = [
    ChallengeDefinition {
        id: 1,
        title: "Hydration Hero",
        description: "Drink 8 glasses of water today",
        max_progress: 8,
    },
    ChallengeDefinition {
        id: 2,
        title: "Self-Care Champion",
        description: "Complete 3 self-care activities",
        max_progress: 3,
    },
    ChallengeDefinition {
        id: 3,
        title: "Mindfulness Master",
        description: "Meditate for 10 minutes",
        max_progress: 1,
    },
    ChallengeDefinition {
        id: 4,
        title: "Morning Routine",
        description: "Complete your morning routine",
        max_progress: 1,
    },
    ChallengeDefinition {
        id: 5,
        title: "Better Sleep",
        description: "Maintain a consistent sleep schedule",
        max_progress: 1,
    },
];

pub fn definition(id: u8) -> Option<&'static ChallengeDefinition> {
    CHALLENGES.iter().find(|def| def.id == id)
}

impl ChallengeDefinition {
    /// Progress after one more step: increments, or wraps to 0 once at max.
    pub fn next_progress(&self, current: u32) -> u32 {
        if current < self.max_progress {
            current + 1
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProgress {
    pub id: u8,
    pub progress: u32,
    /// `None` until the challenge is first touched. Stored snapshots may spell
    /// that as `""`.
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub last_updated: Option<NaiveDate>,
}

fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl ChallengeProgress {
    pub fn fresh(id: u8) -> Self {
        Self {
            id,
            progress: 0,
            last_updated: None,
        }
    }
}

/// A challenge definition joined with its stored progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStatus {
    pub definition: ChallengeDefinition,
    pub progress: u32,
    pub last_updated: Option<NaiveDate>,
}

impl ChallengeStatus {
    pub fn is_complete(&self) -> bool {
        self.progress >= self.definition.max_progress
    }

    pub fn percent(&self) -> f64 {
        if self.definition.max_progress == 0 {
            return 0.0;
        }
        f64::from(self.progress) / f64::from(self.definition.max_progress) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_one_through_five() {
        let ids: Vec<u8> = CHALLENGES.iter().map(|def| def.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn next_progress_wraps_after_max() {
        let hydration = definition(1).unwrap();
        assert_eq!(hydration.next_progress(0), 1);
        assert_eq!(hydration.next_progress(7), 8);
        assert_eq!(hydration.next_progress(8), 0);

        let sleep = definition(5).unwrap();
        assert_eq!(sleep.next_progress(1), 0);
    }

    #[test]
    fn status_reports_completion_and_percent() {
        let status = ChallengeStatus {
            definition: *definition(2).unwrap(),
            progress: 3,
            last_updated: None,
        };
        assert!(status.is_complete());
        assert_eq!(status.percent(), 100.0);

        let partial = ChallengeStatus {
            progress: 1,
            ..status
        };
        assert!(!partial.is_complete());
        assert!((partial.percent() - 33.333).abs() < 0.01);
    }

    #[test]
    fn last_updated_accepts_empty_null_and_dates() {
        let empty: ChallengeProgress =
            serde_json::from_str(r#"{"id": 4, "progress": 0, "lastUpdated": ""}"#).unwrap();
        assert_eq!(empty, ChallengeProgress::fresh(4));

        let null: ChallengeProgress =
            serde_json::from_str(r#"{"id": 4, "progress": 0, "lastUpdated": null}"#).unwrap();
        assert_eq!(null.last_updated, None);

        let dated: ChallengeProgress =
            serde_json::from_str(r#"{"id": 1, "progress": 2, "lastUpdated": "2024-05-30"}"#)
                .unwrap();
        assert_eq!(dated.last_updated, NaiveDate::from_ymd_opt(2024, 5, 30));

        let bad = serde_json::from_str::<ChallengeProgress>(
            r#"{"id": 1, "progress": 2, "lastUpdated": "last week"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn unknown_definition_is_none() {
        assert!(definition(0).is_none());
        assert!(definition(6).is_none());
    }
}
