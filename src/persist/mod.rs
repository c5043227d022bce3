//! Single-file persistence helpers used by the store.

/// JSON file read/parse/encode/write.
pub mod file;

use hashbrown::HashMap;
use serde_json::value::RawValue;

/// Parsed top-level object: store key to the untouched JSON text of its entry.
pub type RawEntries = HashMap<String, Box<RawValue>>;
