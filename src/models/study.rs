//! Study planner data models.
//!
//! Subjects own sessions through `StudySession::subject`; the store enforces
//! the reference on write and cascades on subject deletion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    /// Id of the owning [`StudySubject`].
    pub subject: String,
    pub topic: String,
    /// Minutes.
    pub duration: u32,
    pub date: NaiveDate,
    pub completed: bool,
    pub notes: String,
    pub priority: Priority,
}

/// Input data for creating a study session; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewStudySession {
    pub subject: String,
    pub topic: String,
    pub duration: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub priority: Priority,
}

impl NewStudySession {
    pub(crate) fn into_session(self, id: String) -> StudySession {
        StudySession {
            id,
            subject: self.subject,
            topic: self.topic,
            duration: self.duration,
            date: self.date,
            completed: self.completed,
            notes: self.notes,
            priority: self.priority,
        }
    }
}

/// Partial update for a study session. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudySessionPatch {
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub duration: Option<u32>,
    pub date: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
    pub priority: Option<Priority>,
}

impl StudySessionPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub(crate) fn apply_to(self, session: &mut StudySession) {
        if let Some(subject) = self.subject {
            session.subject = subject;
        }
        if let Some(topic) = self.topic {
            session.topic = topic;
        }
        if let Some(duration) = self.duration {
            session.duration = duration;
        }
        if let Some(date) = self.date {
            session.date = date;
        }
        if let Some(completed) = self.completed {
            session.completed = completed;
        }
        if let Some(notes) = self.notes {
            session.notes = notes;
        }
        if let Some(priority) = self.priority {
            session.priority = priority;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySubject {
    pub id: String,
    pub name: String,
    /// Hex display color, e.g. `#FCE4EC`.
    pub color: String,
    /// Stored, not summed from sessions.
    pub total_hours: f64,
    pub target_hours: f64,
}

impl StudySubject {
    /// `total_hours` as a percentage of `target_hours`; 0 when no target is set.
    pub fn progress_percent(&self) -> f64 {
        if self.target_hours <= 0.0 {
            return 0.0;
        }
        self.total_hours / self.target_hours * 100.0
    }
}

/// Input data for creating a subject; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSubject {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub total_hours: f64,
    pub target_hours: f64,
}

impl NewSubject {
    pub(crate) fn into_subject(self, id: String) -> StudySubject {
        StudySubject {
            id,
            name: self.name,
            color: self.color,
            total_hours: self.total_hours,
            target_hours: self.target_hours,
        }
    }
}

/// Partial update for a subject. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub total_hours: Option<f64>,
    pub target_hours: Option<f64>,
}

impl SubjectPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub(crate) fn apply_to(self, subject: &mut StudySubject) {
        if let Some(name) = self.name {
            subject.name = name;
        }
        if let Some(color) = self.color {
            subject.color = color;
        }
        if let Some(total_hours) = self.total_hours {
            subject.total_hours = total_hours;
        }
        if let Some(target_hours) = self.target_hours {
            subject.target_hours = target_hours;
        }
    }
}

/// Validation functions for subject data
pub mod validation {
    use anyhow::{bail, Result};

    pub fn validate_color(color: &str) -> Result<()> {
        let Some(hex_part) = color.strip_prefix('#') else {
            bail!("Invalid color format. Must be hex (#RRGGBB)");
        };

        if hex_part.len() != 6 && hex_part.len() != 8 {
            bail!("Invalid color format. Must be hex (#RRGGBB or #RRGGBBAA)");
        }

        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("Invalid color format. Must be hex (#RRGGBB)");
        }

        Ok(())
    }

    pub fn validate_hours(field: &str, hours: f64) -> Result<()> {
        if !hours.is_finite() || hours < 0.0 {
            bail!("{field} must be a non-negative number of hours");
        }
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_patch_only_touches_provided_fields() {
        let mut session = StudySession {
            id: "s1".into(),
            subject: "math".into(),
            topic: "Limits".into(),
            duration: 30,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            completed: false,
            notes: "ch. 2".into(),
            priority: Priority::Medium,
        };

        StudySessionPatch {
            completed: Some(true),
            priority: Some(Priority::High),
            ..Default::default()
        }
        .apply_to(&mut session);

        assert!(session.completed);
        assert_eq!(session.priority, Priority::High);
        assert_eq!(session.topic, "Limits");
        assert_eq!(session.duration, 30);
        assert_eq!(session.notes, "ch. 2");
    }

    #[test]
    fn subject_progress_handles_zero_target() {
        let subject = StudySubject {
            id: "x".into(),
            name: "Art".into(),
            color: "#FCE4EC".into(),
            total_hours: 4.0,
            target_hours: 0.0,
        };
        assert_eq!(subject.progress_percent(), 0.0);

        let with_target = StudySubject {
            target_hours: 10.0,
            ..subject
        };
        assert_eq!(with_target.progress_percent(), 40.0);
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(Priority::Low.as_str(), "low");
    }
}
