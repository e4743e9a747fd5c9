//! The well-being store: the single owner of all domain records.
//!
//! Every mutating command updates the in-memory [`Snapshot`], writes the whole
//! snapshot to the configured [`SnapshotSlot`], and then notifies subscribers.
//! If the write fails the command returns [`StoreError::Persist`] but the
//! in-memory change stands; the store stays dirty until a later write succeeds.

mod snapshot;

pub use snapshot::Snapshot;

use chrono::NaiveDate;

use crate::{
    clock::Clock,
    error::{StoreError, StoreResult},
    events::{EventBus, StoreEvent, SubscriptionId},
    models::{
        challenge, mood_window, new_id, study::validation, ChallengeProgress, ChallengeStatus,
        JournalEntry, MoodDay, MoodEntry, NewStudySession, NewSubject, StudySession,
        StudySessionPatch, StudySubject, SubjectPatch, CHALLENGES, POINTS_PER_STEP,
    },
    settings::{Settings, SettingsPatch},
    storage::SnapshotSlot,
};

// Set to true to log every snapshot write
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

pub struct WellbeingStore {
    state: Snapshot,
    slot: Box<dyn SnapshotSlot>,
    clock: Box<dyn Clock>,
    events: EventBus,
    dirty: bool,
}

impl WellbeingStore {
    /// Rehydrates the store from `slot`, or starts from defaults if the slot is
    /// empty. A payload that does not parse is reported as
    /// [`StoreError::Corrupt`] rather than silently replaced.
    pub fn open<S, C>(slot: S, clock: C) -> StoreResult<Self>
    where
        S: SnapshotSlot + 'static,
        C: Clock + 'static,
    {
        Self::open_boxed(Box::new(slot), Box::new(clock))
    }

    pub fn open_boxed(slot: Box<dyn SnapshotSlot>, clock: Box<dyn Clock>) -> StoreResult<Self> {
        let payload = slot.load().map_err(StoreError::Load)?;

        let (state, dirty) = match payload {
            Some(raw) => {
                let mut state = Snapshot::from_json(&raw)?;
                let repairs = state.normalize();
                if repairs > 0 {
                    log_warn!(
                        "Repaired {repairs} inconsistencies in snapshot from {}",
                        slot.describe()
                    );
                }
                log_info!(
                    "Loaded snapshot from {} ({} moods, {} entries, {} sessions, {} subjects)",
                    slot.describe(),
                    state.moods.len(),
                    state.entries.len(),
                    state.study_sessions.len(),
                    state.subjects.len()
                );
                (state, repairs > 0)
            }
            None => {
                log_info!("No snapshot at {}; starting fresh", slot.describe());
                (Snapshot::default(), false)
            }
        };

        Ok(Self {
            state,
            slot,
            clock,
            events: EventBus::new(),
            dirty,
        })
    }

    // ---- observers ----

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ---- persistence ----

    /// True when the in-memory state is ahead of the slot.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The whole current state, as it would be persisted.
    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    /// Writes the current state to the slot.
    pub fn flush(&mut self) -> StoreResult<()> {
        let payload = self.state.to_json().map_err(|err| {
            StoreError::Persist(anyhow::Error::new(err).context("failed to serialize snapshot"))
        })?;

        match self.slot.save(&payload) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                log_error!("Snapshot write to {} failed: {err:#}", self.slot.describe());
                Err(StoreError::Persist(err))
            }
        }
    }

    fn commit(&mut self, event: StoreEvent) -> StoreResult<()> {
        self.dirty = true;
        let written = self.flush();
        self.events.emit(event);
        written
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Restores defaults: every collection emptied, challenges zeroed, default
    /// settings.
    pub fn reset(&mut self) -> StoreResult<()> {
        self.state = Snapshot::default();
        log_info!("Store reset to defaults");
        self.commit(StoreEvent::StoreReset)
    }

    // ---- moods ----

    pub fn add_mood(
        &mut self,
        mood: impl Into<String>,
        note: impl Into<String>,
    ) -> StoreResult<MoodEntry> {
        let entry = MoodEntry {
            id: new_id(),
            mood: mood.into(),
            note: note.into(),
            date: self.today(),
        };
        self.state.moods.push(entry.clone());
        self.commit(StoreEvent::MoodsUpdated)?;
        Ok(entry)
    }

    /// Returns `Ok(false)` when no mood has this id.
    pub fn delete_mood(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.state.moods.len();
        self.state.moods.retain(|entry| entry.id != id);
        if self.state.moods.len() == before {
            return Ok(false);
        }
        self.commit(StoreEvent::MoodsUpdated)?;
        Ok(true)
    }

    /// All moods in the order they were logged.
    pub fn mood_history(&self) -> &[MoodEntry] {
        &self.state.moods
    }

    /// The trailing `days` days ending today, oldest first.
    pub fn mood_window(&self, days: u32) -> Vec<MoodDay> {
        mood_window(&self.state.moods, self.today(), days)
    }

    // ---- journal ----

    pub fn add_entry(
        &mut self,
        content: impl Into<String>,
        stickers: Vec<String>,
        is_draft: bool,
    ) -> StoreResult<JournalEntry> {
        let entry = JournalEntry {
            id: new_id(),
            content: content.into(),
            stickers,
            date: self.today(),
            is_draft,
        };
        self.state.entries.push(entry.clone());
        self.commit(StoreEvent::JournalUpdated)?;
        Ok(entry)
    }

    /// Replaces content, stickers and draft flag. The date is kept.
    /// Returns `Ok(None)` when no entry has this id.
    pub fn update_entry(
        &mut self,
        id: &str,
        content: impl Into<String>,
        stickers: Vec<String>,
        is_draft: bool,
    ) -> StoreResult<Option<JournalEntry>> {
        let Some(entry) = self.state.entries.iter_mut().find(|entry| entry.id == id) else {
            return Ok(None);
        };
        entry.content = content.into();
        entry.stickers = stickers;
        entry.is_draft = is_draft;
        let updated = entry.clone();

        self.commit(StoreEvent::JournalUpdated)?;
        Ok(Some(updated))
    }

    pub fn delete_entry(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.state.entries.len();
        self.state.entries.retain(|entry| entry.id != id);
        if self.state.entries.len() == before {
            return Ok(false);
        }
        self.commit(StoreEvent::JournalUpdated)?;
        Ok(true)
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.state.entries
    }

    // ---- challenges ----

    /// Sets progress for one of the fixed challenges and stamps it with today.
    pub fn update_challenge(&mut self, id: u8, progress: u32) -> StoreResult<ChallengeProgress> {
        let def = challenge::definition(id).ok_or(StoreError::UnknownChallenge(id))?;
        if progress > def.max_progress {
            return Err(StoreError::Validation(format!(
                "progress {progress} exceeds max {} for challenge '{}'",
                def.max_progress, def.title
            )));
        }

        let today = self.today();
        let record = self
            .state
            .challenges
            .entry(id)
            .or_insert_with(|| ChallengeProgress::fresh(id));
        record.progress = progress;
        record.last_updated = Some(today);
        let updated = record.clone();

        self.commit(StoreEvent::ChallengesUpdated)?;
        Ok(updated)
    }

    /// One step forward; wraps to 0 when the challenge is already at max.
    pub fn advance_challenge(&mut self, id: u8) -> StoreResult<u32> {
        let def = challenge::definition(id).ok_or(StoreError::UnknownChallenge(id))?;
        let current = self
            .state
            .challenges
            .get(&id)
            .map(|record| record.progress)
            .unwrap_or(0);
        let next = def.next_progress(current);
        self.update_challenge(id, next)?;
        Ok(next)
    }

    pub fn challenge(&self, id: u8) -> Option<&ChallengeProgress> {
        self.state.challenges.get(&id)
    }

    /// Progress records ordered by challenge id.
    pub fn challenges(&self) -> impl Iterator<Item = &ChallengeProgress> {
        self.state.challenges.values()
    }

    pub fn challenge_statuses(&self) -> Vec<ChallengeStatus> {
        CHALLENGES
            .iter()
            .map(|def| {
                let record = self.state.challenges.get(&def.id);
                ChallengeStatus {
                    definition: *def,
                    progress: record.map(|r| r.progress).unwrap_or(0),
                    last_updated: record.and_then(|r| r.last_updated),
                }
            })
            .collect()
    }

    /// Ten points per unit of progress across all challenges.
    pub fn points(&self) -> u32 {
        self.state
            .challenges
            .values()
            .map(|record| record.progress * POINTS_PER_STEP)
            .sum()
    }

    // ---- study sessions ----

    fn ensure_subject(&self, subject_id: &str) -> StoreResult<()> {
        if self.state.subjects.iter().any(|s| s.id == subject_id) {
            Ok(())
        } else {
            Err(StoreError::UnknownSubject(subject_id.to_string()))
        }
    }

    pub fn add_study_session(&mut self, input: NewStudySession) -> StoreResult<StudySession> {
        self.ensure_subject(&input.subject)?;

        let session = input.into_session(new_id());
        self.state.study_sessions.push(session.clone());
        self.commit(StoreEvent::StudyUpdated)?;
        Ok(session)
    }

    /// Applies only the fields set in `patch`. Returns `Ok(None)` when no
    /// session has this id, whatever the patch holds.
    pub fn update_study_session(
        &mut self,
        id: &str,
        patch: StudySessionPatch,
    ) -> StoreResult<Option<StudySession>> {
        let Some(index) = self.state.study_sessions.iter().position(|s| s.id == id) else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(self.state.study_sessions[index].clone()));
        }
        if let Some(subject) = patch.subject.as_deref() {
            self.ensure_subject(subject)?;
        }

        let session = &mut self.state.study_sessions[index];
        patch.apply_to(session);
        let updated = session.clone();

        self.commit(StoreEvent::StudyUpdated)?;
        Ok(Some(updated))
    }

    pub fn set_session_completed(
        &mut self,
        id: &str,
        completed: bool,
    ) -> StoreResult<Option<StudySession>> {
        self.update_study_session(
            id,
            StudySessionPatch {
                completed: Some(completed),
                ..Default::default()
            },
        )
    }

    pub fn delete_study_session(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.state.study_sessions.len();
        self.state.study_sessions.retain(|s| s.id != id);
        if self.state.study_sessions.len() == before {
            return Ok(false);
        }
        self.commit(StoreEvent::StudyUpdated)?;
        Ok(true)
    }

    pub fn study_sessions(&self) -> &[StudySession] {
        &self.state.study_sessions
    }

    pub fn sessions_for_subject<'a>(
        &'a self,
        subject_id: &'a str,
    ) -> impl Iterator<Item = &'a StudySession> + 'a {
        self.state
            .study_sessions
            .iter()
            .filter(move |s| s.subject == subject_id)
    }

    // ---- subjects ----

    fn validate_subject_fields(
        color: Option<&str>,
        total_hours: Option<f64>,
        target_hours: Option<f64>,
    ) -> StoreResult<()> {
        let check = || -> anyhow::Result<()> {
            if let Some(color) = color {
                validation::validate_color(color)?;
            }
            if let Some(hours) = total_hours {
                validation::validate_hours("totalHours", hours)?;
            }
            if let Some(hours) = target_hours {
                validation::validate_hours("targetHours", hours)?;
            }
            Ok(())
        };
        check().map_err(|err| StoreError::Validation(err.to_string()))
    }

    pub fn add_subject(&mut self, input: NewSubject) -> StoreResult<StudySubject> {
        Self::validate_subject_fields(
            Some(&input.color),
            Some(input.total_hours),
            Some(input.target_hours),
        )?;

        let subject = input.into_subject(new_id());
        self.state.subjects.push(subject.clone());
        self.commit(StoreEvent::StudyUpdated)?;
        Ok(subject)
    }

    /// Returns `Ok(None)` when no subject has this id, whatever the patch holds.
    pub fn update_subject(
        &mut self,
        id: &str,
        patch: SubjectPatch,
    ) -> StoreResult<Option<StudySubject>> {
        let Some(index) = self.state.subjects.iter().position(|s| s.id == id) else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(self.state.subjects[index].clone()));
        }
        Self::validate_subject_fields(patch.color.as_deref(), patch.total_hours, patch.target_hours)?;

        let subject = &mut self.state.subjects[index];
        patch.apply_to(subject);
        let updated = subject.clone();

        self.commit(StoreEvent::StudyUpdated)?;
        Ok(Some(updated))
    }

    /// Removes the subject and every session that references it in one step.
    pub fn delete_subject(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.state.subjects.len();
        self.state.subjects.retain(|s| s.id != id);
        if self.state.subjects.len() == before {
            return Ok(false);
        }

        let sessions_before = self.state.study_sessions.len();
        self.state.study_sessions.retain(|s| s.subject != id);
        let cascaded = sessions_before - self.state.study_sessions.len();
        if cascaded > 0 {
            log_info!("Deleting subject {id} removed {cascaded} study session(s)");
        }

        self.commit(StoreEvent::StudyUpdated)?;
        Ok(true)
    }

    pub fn subjects(&self) -> &[StudySubject] {
        &self.state.subjects
    }

    pub fn subject(&self, id: &str) -> Option<&StudySubject> {
        self.state.subjects.iter().find(|s| s.id == id)
    }

    // ---- settings ----

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Merges the fields set in `patch`. A patch that changes nothing is not
    /// written and fires no event.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> StoreResult<Settings> {
        if patch.is_empty() || !self.state.settings.merge(patch) {
            return Ok(self.state.settings.clone());
        }
        self.commit(StoreEvent::SettingsUpdated)?;
        Ok(self.state.settings.clone())
    }
}

impl std::fmt::Debug for WellbeingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WellbeingStore")
            .field("slot", &self.slot.describe())
            .field("dirty", &self.dirty)
            .field("moods", &self.state.moods.len())
            .field("entries", &self.state.entries.len())
            .field("study_sessions", &self.state.study_sessions.len())
            .field("subjects", &self.state.subjects.len())
            .finish()
    }
}
