//! Route sheet and preference store implementations

mod memory;
mod yaml;

pub use memory::{MemoryPreferences, MemoryRouteSheets};
pub use yaml::{RaceBook, YamlRouteSheets};
