//! In-memory authoritative store.

/// Lock-guarded record map with file load/save.
pub mod store;
