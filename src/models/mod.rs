pub mod challenge;
pub mod journal;
pub mod mood;
pub mod study;

pub use challenge::{
    ChallengeDefinition, ChallengeProgress, ChallengeStatus, CHALLENGES, POINTS_PER_STEP,
};
pub use journal::JournalEntry;
pub use mood::{mood_window, MoodDay, MoodEntry, MOOD_LABELS};
pub use study::{
    NewStudySession, NewSubject, Priority, StudySession, StudySessionPatch, StudySubject,
    SubjectPatch,
};

use serde::de::DeserializeOwned;

use crate::error::{StoreError, StoreResult};

/// Parses a JSON patch payload, rejecting unknown keys and mistyped values.
pub fn parse_patch<T: DeserializeOwned>(raw: &str) -> StoreResult<T> {
    serde_json::from_str(raw).map_err(|err| StoreError::InvalidPatch(err.to_string()))
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
