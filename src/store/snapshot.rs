use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    error::StoreResult,
    models::{ChallengeProgress, JournalEntry, MoodEntry, StudySession, StudySubject, CHALLENGES},
    settings::Settings,
};

// Set to true to log snapshot repairs
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// The full persisted state. This is also the in-memory representation the
/// store operates on.
///
/// Unknown top-level keys are rejected so that a payload of the wrong shape
/// surfaces as corrupt instead of loading as an empty store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default)]
    pub moods: Vec<MoodEntry>,
    #[serde(default)]
    pub entries: Vec<JournalEntry>,
    /// Keyed by challenge id; serialized with string keys `"1"`..`"5"`.
    #[serde(default = "default_challenges")]
    pub challenges: BTreeMap<u8, ChallengeProgress>,
    #[serde(default)]
    pub study_sessions: Vec<StudySession>,
    #[serde(default)]
    pub subjects: Vec<StudySubject>,
    #[serde(default)]
    pub settings: Settings,
}

fn default_challenges() -> BTreeMap<u8, ChallengeProgress> {
    CHALLENGES
        .iter()
        .map(|def| (def.id, ChallengeProgress::fresh(def.id)))
        .collect()
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            moods: Vec::new(),
            entries: Vec::new(),
            challenges: default_challenges(),
            study_sessions: Vec::new(),
            subjects: Vec::new(),
            settings: Settings::default(),
        }
    }
}

impl Snapshot {
    pub fn from_json(raw: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restores the invariants a hand-edited or older snapshot may break:
    /// exactly challenges 1..=5, each keyed by its own id, and no session
    /// pointing at a missing subject. Returns the number of repairs made.
    pub fn normalize(&mut self) -> usize {
        let mut repairs = 0;

        let known: HashSet<u8> = CHALLENGES.iter().map(|def| def.id).collect();
        let before = self.challenges.len();
        self.challenges.retain(|id, _| known.contains(id));
        if self.challenges.len() != before {
            log_warn!(
                "Dropped {} unknown challenge(s) from snapshot",
                before - self.challenges.len()
            );
            repairs += before - self.challenges.len();
        }

        for def in CHALLENGES.iter() {
            let entry = self
                .challenges
                .entry(def.id)
                .or_insert_with(|| {
                    repairs += 1;
                    ChallengeProgress::fresh(def.id)
                });
            if entry.id != def.id {
                entry.id = def.id;
                repairs += 1;
            }
            if entry.progress > def.max_progress {
                log_warn!(
                    "Challenge {} progress {} exceeds max {}; resetting",
                    def.id,
                    entry.progress,
                    def.max_progress
                );
                entry.progress = 0;
                repairs += 1;
            }
        }

        let subject_ids: HashSet<&str> = self.subjects.iter().map(|s| s.id.as_str()).collect();
        let before = self.study_sessions.len();
        self.study_sessions
            .retain(|session| subject_ids.contains(session.subject.as_str()));
        let orphaned = before - self.study_sessions.len();
        if orphaned > 0 {
            log_warn!("Dropped {orphaned} study session(s) referencing missing subjects");
            repairs += orphaned;
        }

        repairs
    }
}
