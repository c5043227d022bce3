//! JSON store file on local disk.
//!
//! The file is a single JSON object keyed by store key, indented with three
//! spaces, written with owner-only permissions on unix.

use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::Path,
};

use serde::Serialize;

use crate::error::{StoreError, StoreResult};

use super::RawEntries;

const INDENT: &[u8] = b"   ";

#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Reads the whole file, or `None` when it does not exist.
pub fn read_file(path: &Path) -> StoreResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Splits file contents into per-entry raw payloads without decoding them.
pub fn parse_entries(path: &Path, bytes: &[u8]) -> StoreResult<RawEntries> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes `value` as indented JSON with a trailing newline.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(StoreError::Encode)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Replaces the file contents with `bytes`, creating parent directories.
pub fn write_file(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(FILE_MODE);
    }

    let mut file = opts.open(path).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.flush().map_err(write_err)
}
