//! Journal entries and the filter/sort pipeline

mod entry;
mod filter;

pub use entry::{Coordinate, Entry, EntryDraft};
pub use filter::{
    filter_and_sort, unique_locations, FilterConfig, LocationFilter, SortOrder, ALL_LOCATIONS,
};
