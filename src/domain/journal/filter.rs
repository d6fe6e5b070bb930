//! Filter and sort pipeline over journal entries
//!
//! Pure functions: the input collection is never mutated, the result is a
//! reordered list of references into it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::error::InvalidSortOrderError;

use super::Entry;

/// Label shown for the "no location filter" choice
pub const ALL_LOCATIONS: &str = "All";

/// Display order for filtered entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
    MostLiked,
    Alphabetical,
}

impl SortOrder {
    /// All orders, in menu order
    pub const ALL: [SortOrder; 4] = [
        Self::NewestFirst,
        Self::OldestFirst,
        Self::MostLiked,
        Self::Alphabetical,
    ];

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewestFirst => "newest",
            Self::OldestFirst => "oldest",
            Self::MostLiked => "most-liked",
            Self::Alphabetical => "a-z",
        }
    }

    /// Human-readable label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NewestFirst => "Newest First",
            Self::OldestFirst => "Oldest First",
            Self::MostLiked => "Most Liked",
            Self::Alphabetical => "A to Z",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = InvalidSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" | "newest-first" => Ok(Self::NewestFirst),
            "oldest" | "oldest-first" => Ok(Self::OldestFirst),
            "most-liked" | "liked" => Ok(Self::MostLiked),
            "a-z" | "alphabetical" => Ok(Self::Alphabetical),
            _ => Err(InvalidSortOrderError {
                input: s.to_string(),
            }),
        }
    }
}

/// Location restriction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LocationFilter {
    #[default]
    All,
    Only(String),
}

impl LocationFilter {
    /// Map a menu label to a filter; [`ALL_LOCATIONS`] means no restriction
    pub fn from_label(label: &str) -> Self {
        if label == ALL_LOCATIONS {
            Self::All
        } else {
            Self::Only(label.to_string())
        }
    }

    /// Exact match on the location label
    pub fn matches(&self, location_label: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == location_label,
        }
    }
}

impl fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{}", ALL_LOCATIONS),
            Self::Only(label) => write!(f, "{}", label),
        }
    }
}

/// Current search and sort settings. Lives only as long as the caller
/// keeps it; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterConfig {
    pub search_text: String,
    pub location: LocationFilter,
    pub audio_only: bool,
    pub sort_order: SortOrder,
}

impl FilterConfig {
    /// Restore every field to its default
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any filter (not counting sort order) narrows the collection
    pub fn is_filtering(&self) -> bool {
        !self.search_text.is_empty() || self.location != LocationFilter::All || self.audio_only
    }
}

/// Filter `entries` by `config` and return them in display order.
///
/// Filters run in a fixed order (search text, location, audio) and the sort
/// is stable, so ties keep their original relative order.
pub fn filter_and_sort<'a>(entries: &'a [Entry], config: &FilterConfig) -> Vec<&'a Entry> {
    let needle = config.search_text.to_lowercase();

    let mut view: Vec<&Entry> = entries
        .iter()
        .filter(|e| needle.is_empty() || matches_search(e, &needle))
        .filter(|e| config.location.matches(&e.location_label))
        .filter(|e| !config.audio_only || e.has_audio())
        .collect();

    match config.sort_order {
        SortOrder::NewestFirst => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::OldestFirst => view.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::MostLiked => view.sort_by(|a, b| b.like_count.cmp(&a.like_count)),
        SortOrder::Alphabetical => view.sort_by_cached_key(|e| collation_key(&e.title)),
    }

    view
}

/// `"All"` followed by the distinct location labels, sorted ascending.
///
/// Labels differing only in case collapse to the first one seen.
pub fn unique_locations(entries: &[Entry]) -> Vec<String> {
    let mut distinct: BTreeMap<(String, String), &str> = BTreeMap::new();
    for entry in entries {
        distinct
            .entry(collation_key(&entry.location_label))
            .or_insert(&entry.location_label);
    }

    std::iter::once(ALL_LOCATIONS.to_string())
        .chain(distinct.into_values().map(str::to_string))
        .collect()
}

fn matches_search(entry: &Entry, needle: &str) -> bool {
    [&entry.title, &entry.body, &entry.location_label]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// Case-insensitive ordering key that files accented letters with their
/// base letter (`Éclair` between `apple` and `Zebra`). The lowercase form
/// breaks ties, so `eclair` still sorts before `éclair`.
fn collation_key(s: &str) -> (String, String) {
    let folded = fold_case(s);
    let base = folded.nfd().filter(|c| !is_combining_mark(*c)).collect();
    (base, folded)
}
