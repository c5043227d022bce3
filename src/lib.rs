//! Thread-safe in-process key-value store with single-file JSON persistence.
//!
//! A [`Store`] maps string keys to records of one type implementing
//! [`Record`]. It loads its file on construction, tracks whether the mapping
//! changed, and writes the file back on [`Store::save`], [`Store::close`] or
//! drop only when there is something new to write.
//!
//! # Examples
//!
//! ```
//! use kvstore::{Record, Store, StoreConfig};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
//! struct PhoneCode {
//!     phone: String,
//!     code: String,
//!     stamp_ms: u64,
//! }
//!
//! impl Record for PhoneCode {
//!     fn initialize(mut self) -> Self {
//!         self.stamp_ms = 1;
//!         self
//!     }
//! }
//!
//! let dir = tempfile::tempdir().expect("tempdir");
//! let path = dir.path().join("codes.json");
//!
//! let store = Store::<PhoneCode>::open(StoreConfig::with_file(&path)).expect("open");
//! let fresh = PhoneCode { phone: "12345".into(), code: "0000".into(), stamp_ms: 0 };
//! assert!(!store.set("alice", fresh));
//! assert_eq!(store.get("alice").map(|c| c.stamp_ms), Some(1));
//! assert!(store.close().expect("close"));
//!
//! let reopened = Store::<PhoneCode>::open(StoreConfig::with_file(&path)).expect("reopen");
//! assert_eq!(reopened.get("alice").map(|c| c.code), Some("0000".to_string()));
//! ```
#![deny(missing_docs)]

/// Store configuration and construction options.
pub mod config;
/// Core in-memory store.
pub mod core;
/// Error taxonomy.
pub mod error;
/// JSON file persistence.
pub mod persist;
/// Record contract.
pub mod record;

pub use crate::core::store::{LoadOutcome, Store};
pub use config::{ErrorPolicy, StoreConfig, StoreOption};
pub use error::{StoreError, StoreResult};
pub use record::Record;
