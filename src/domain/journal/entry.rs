//! Journal entry entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DraftError;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single journal memory.
///
/// Owned by the entry store. The filter pipeline only reads and reorders
/// references to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub location_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_name: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl Entry {
    /// Create a fresh entry stamped with the current time and no likes
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        location_label: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            location_label: location_label.into(),
            coordinate: None,
            created_at: Utc::now(),
            like_count: 0,
            audio_name: None,
            is_anonymous: false,
        }
    }

    /// Whether a voice note is attached
    pub fn has_audio(&self) -> bool {
        self.audio_name.is_some()
    }

    pub fn like(&mut self) {
        self.like_count = self.like_count.saturating_add(1);
    }
}

/// User input for a new entry, before validation
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub title: String,
    pub body: String,
    pub location_label: String,
    pub is_anonymous: bool,
}

impl EntryDraft {
    /// Check the draft is complete. A body is optional when a voice note is
    /// attached.
    pub fn validate(&self, has_audio: bool) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.location_label.trim().is_empty() {
            return Err(DraftError::MissingLocation);
        }
        if self.body.trim().is_empty() && !has_audio {
            return Err(DraftError::MissingContent);
        }
        Ok(())
    }

    /// Build the entry from the trimmed draft fields
    pub fn into_entry(
        self,
        coordinate: Option<Coordinate>,
        audio_name: Option<String>,
    ) -> Entry {
        let mut entry = Entry::new(
            self.title.trim(),
            self.body.trim(),
            self.location_label.trim(),
        );
        entry.coordinate = coordinate;
        entry.audio_name = audio_name;
        entry.is_anonymous = self.is_anonymous;
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, body: &str, location: &str) -> EntryDraft {
        EntryDraft {
            title: title.to_string(),
            body: body.to_string(),
            location_label: location.to_string(),
            is_anonymous: false,
        }
    }

    #[test]
    fn new_entry_has_no_likes_or_audio() {
        let entry = Entry::new("Title", "Body", "Paris");
        assert_eq!(entry.like_count, 0);
        assert!(!entry.has_audio());
        assert!(entry.coordinate.is_none());
    }

    #[test]
    fn like_increments() {
        let mut entry = Entry::new("Title", "Body", "Paris");
        entry.like();
        entry.like();
        assert_eq!(entry.like_count, 2);
    }

    #[test]
    fn validate_requires_title() {
        let err = draft("   ", "body", "Paris").validate(false).unwrap_err();
        assert_eq!(err, DraftError::MissingTitle);
    }

    #[test]
    fn validate_requires_location() {
        let err = draft("Title", "body", " ").validate(false).unwrap_err();
        assert_eq!(err, DraftError::MissingLocation);
    }

    #[test]
    fn validate_requires_body_or_audio() {
        let d = draft("Title", "  ", "Paris");
        assert_eq!(d.validate(false).unwrap_err(), DraftError::MissingContent);
        assert!(d.validate(true).is_ok());
    }

    #[test]
    fn into_entry_trims_fields() {
        let entry = draft("  Title ", " Body ", " Paris ")
            .into_entry(Some(Coordinate::new(48.85, 2.35)), Some("a.flac".into()));
        assert_eq!(entry.title, "Title");
        assert_eq!(entry.body, "Body");
        assert_eq!(entry.location_label, "Paris");
        assert!(entry.has_audio());
        assert_eq!(entry.coordinate, Some(Coordinate::new(48.85, 2.35)));
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "title": "Beach",
            "body": "Sunset",
            "location_label": "Nice",
            "created_at": "2025-12-01T10:00:00Z"
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.like_count, 0);
        assert!(!entry.has_audio());
        assert!(!entry.is_anonymous);
    }
}
