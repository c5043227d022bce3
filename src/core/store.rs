use std::{
    collections::BTreeMap,
    fmt,
    path::Path,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use hashbrown::HashMap;
use tracing::{Span, debug, error, info, info_span};

use crate::{
    config::{self, ErrorPolicy, StoreConfig, StoreOption},
    error::{StoreError, StoreResult},
    persist::{RawEntries, file},
    record::Record,
};

/// What a [`Store::load`] call did to the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No store file; mapping left as it was.
    Missing,
    /// Store file could not be read; mapping left as it was.
    Unreadable,
    /// Mapping replaced with the file contents.
    Loaded {
        /// Entries in the new mapping, placeholders included.
        entries: usize,
        /// Entries that failed to decode and were kept as `R::default()`.
        failed: usize,
    },
}

struct State<R> {
    records: HashMap<String, R>,
    dirty: bool,
    closed: bool,
}

/// Thread-safe string-keyed record map persisted to one JSON file.
///
/// The file is loaded on construction and saved on [`Store::close`] or drop,
/// and only written when something changed since the last load or save.
pub struct Store<R: Record> {
    state: RwLock<State<R>>,
    config: StoreConfig,
    span: Span,
}

impl<R: Record> Store<R> {
    /// Builds a store from `options` applied in order, then loads its file.
    ///
    /// A rejected option aborts construction. Load failures abort only under
    /// [`ErrorPolicy::Strict`].
    pub fn new(options: impl IntoIterator<Item = StoreOption>) -> StoreResult<Self> {
        let config = config::resolve(options)?;
        let span = info_span!("kvstore", file = %config.file.display());
        let store = Self {
            state: RwLock::new(State {
                records: HashMap::new(),
                dirty: false,
                closed: false,
            }),
            config,
            span,
        };
        store.load()?;
        Ok(store)
    }

    /// Builds a store from a complete config.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        Self::new([StoreOption::Config(config)])
    }

    /// Stores `value.initialize()` under `key`; returns true if it replaced an entry.
    pub fn set(&self, key: impl Into<String>, value: R) -> bool {
        let key = key.into();
        let record = value.initialize();
        let mut state = self.write_state();
        debug!(parent: &self.span, key = %key, "set");
        let existed = state.records.insert(key, record).is_some();
        state.dirty = true;
        existed
    }

    /// Returns a copy of the record under `key`.
    pub fn get(&self, key: &str) -> Option<R> {
        let state = self.read_state();
        let record = state.records.get(key).cloned();
        debug!(parent: &self.span, key, found = record.is_some(), "get");
        record
    }

    /// Removes `key`; returns true if it was present.
    pub fn delete(&self, key: &str) -> bool {
        let mut state = self.write_state();
        let existed = state.records.remove(key).is_some();
        if existed {
            state.dirty = true;
        }
        debug!(parent: &self.span, key, existed, "delete");
        existed
    }

    /// Replaces the whole mapping with the file contents and clears the dirty flag.
    ///
    /// A missing file is never an error. Under [`ErrorPolicy::Lenient`] an
    /// unreadable file keeps the current mapping, a malformed file yields an
    /// empty one, and entries that fail to decode are kept as `R::default()`.
    /// Under [`ErrorPolicy::Strict`] each of those returns an error and leaves
    /// the mapping untouched.
    pub fn load(&self) -> StoreResult<LoadOutcome> {
        let path = self.config.file.as_path();
        let mut state = self.write_state();

        let bytes = match file::read_file(path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!(parent: &self.span, "store file does not exist, keeping current state");
                return Ok(LoadOutcome::Missing);
            }
            Err(err) => {
                error!(parent: &self.span, error = %err, "store file unreadable, keeping current state");
                return self.recover(err, LoadOutcome::Unreadable);
            }
        };

        let raw = match file::parse_entries(path, &bytes) {
            Ok(raw) => raw,
            Err(err) => {
                error!(parent: &self.span, error = %err, "store file malformed");
                self.recover(err, RawEntries::new())?
            }
        };

        let mut records = HashMap::with_capacity(raw.len());
        let mut failed = 0usize;
        for (key, payload) in raw {
            let record = match R::reconstitute(payload.get().as_bytes()) {
                Ok(record) => record,
                Err(source) => {
                    error!(parent: &self.span, key = %key, error = %source, "entry decode failed");
                    failed += 1;
                    self.recover(StoreError::Decode { key: key.clone(), source }, R::default())?
                }
            };
            records.insert(key, record);
        }

        let entries = records.len();
        state.records = records;
        state.dirty = false;
        info!(parent: &self.span, entries, failed, "store loaded");
        Ok(LoadOutcome::Loaded { entries, failed })
    }

    /// Writes the mapping to the store file if it changed; returns whether a write was attempted.
    ///
    /// An empty mapping is never written. Under [`ErrorPolicy::Lenient`] a
    /// failed write is logged, the dirty flag still clears and the result is
    /// `Ok(true)`. Under [`ErrorPolicy::Strict`] the error is returned and the
    /// store stays dirty.
    pub fn save(&self) -> StoreResult<bool> {
        let mut state = self.write_state();
        if state.records.is_empty() {
            state.dirty = false;
            return Ok(false);
        }
        if !state.dirty {
            return Ok(false);
        }

        let path = self.config.file.as_path();
        // Sorted keys keep the file stable across saves of the same mapping.
        let sorted: BTreeMap<&str, &R> = state.records.iter().map(|(k, v)| (k.as_str(), v)).collect();
        let written = file::encode(&sorted).and_then(|bytes| file::write_file(path, &bytes));
        match written {
            Ok(()) => info!(parent: &self.span, entries = state.records.len(), "store saved"),
            Err(err) => {
                error!(parent: &self.span, error = %err, "store save failed");
                self.recover(err, ())?;
            }
        }
        state.dirty = false;
        Ok(true)
    }

    /// Saves once more and consumes the store.
    ///
    /// This is the only teardown save: dropping the store afterwards does not
    /// retry, even when a strict save failed.
    pub fn close(self) -> StoreResult<bool> {
        let saved = self.save();
        self.write_state().closed = true;
        saved
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.read_state().records.len()
    }

    /// Returns `true` when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.read_state().records.is_empty()
    }

    /// Returns `true` when the mapping changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.read_state().dirty
    }

    /// Store file path.
    pub fn path(&self) -> &Path {
        &self.config.file
    }

    /// Effective config after all options were applied.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn recover<T>(&self, err: StoreError, fallback: T) -> StoreResult<T> {
        match self.config.policy {
            ErrorPolicy::Lenient => Ok(fallback),
            ErrorPolicy::Strict => Err(err),
        }
    }

    // Every mutation is a single insert/remove, so a poisoned map is still whole.
    fn read_state(&self) -> RwLockReadGuard<'_, State<R>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State<R>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: Record> Drop for Store<R> {
    fn drop(&mut self) {
        if self.read_state().closed {
            return;
        }
        let _ = self.save();
    }
}

impl<R: Record> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("Store")
            .field("file", &self.config.file)
            .field("policy", &self.config.policy)
            .field("entries", &state.records.len())
            .field("dirty", &state.dirty)
            .finish()
    }
}
