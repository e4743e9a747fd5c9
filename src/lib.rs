//! Local-first store for moods, journal entries, self-care challenges, study
//! planning and profile settings.
//!
//! ```no_run
//! use moodbloom_lib::{open_store, StoreConfig};
//!
//! let mut store = open_store(&StoreConfig::default())?;
//! store.subscribe(|event| println!("{} changed", event.name()));
//! store.add_mood("Happy", "long walk")?;
//! println!("{} points", store.points());
//! # Ok::<(), moodbloom_lib::StoreError>(())
//! ```

mod clock;
mod config;
mod error;
mod events;
mod models;
mod settings;
mod storage;
mod store;
mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Backend, StoreConfig, DEFAULT_STORAGE_KEY};
pub use error::{StoreError, StoreResult};
pub use events::{StoreEvent, SubscriptionId};
pub use models::{
    challenge::definition as challenge_definition, mood_window, parse_patch, ChallengeDefinition,
    ChallengeProgress, ChallengeStatus, JournalEntry, MoodDay, MoodEntry, NewStudySession,
    NewSubject, Priority, StudySession, StudySessionPatch, StudySubject, SubjectPatch, CHALLENGES,
    MOOD_LABELS, POINTS_PER_STEP,
};
pub use settings::{Privacy, Settings, SettingsPatch};
pub use storage::{JsonFileSlot, MemorySlot, SnapshotSlot, SqliteSlot};
pub use store::{Snapshot, WellbeingStore};
pub use utils::init_logging;

/// Opens the store described by `config` with the system clock.
pub fn open_store(config: &StoreConfig) -> StoreResult<WellbeingStore> {
    let slot = config.open_slot().map_err(StoreError::Load)?;
    log::info!("Opening MoodBloom store at {}", slot.describe());
    WellbeingStore::open_boxed(slot, Box::new(SystemClock))
}
