// Copyright 2025 Logwheel Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Byte-level file appends, with a best-effort storage-capacity check and the
//! JSON-array framing used by the JSON file backend.

use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;

use crate::error::WriteError;

/// How appended records are framed in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Framing {
    /// One record per line, trailing newline.
    Line,
    /// A single well-formed JSON array per file.
    JsonArray,
}

pub(crate) fn append(path: &Path, bytes: &[u8], framing: Framing) -> Result<(), WriteError> {
    match framing {
        Framing::Line => append_line(path, bytes),
        Framing::JsonArray => append_json_element(path, bytes),
    }
}

/// Appends `bytes` to the file at `path`, creating it if absent.
fn append_line(path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    ensure_capacity(path, bytes.len() as u64)?;

    if path.exists() {
        let mut file = OpenOptions::new().append(true).open(path).map_err(|source| {
            WriteError::UnableToOpenFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        file.write_all(bytes)?;
    } else {
        create_with(path, bytes)?;
    }
    Ok(())
}

/// Appends one serialized JSON object to the array in the file at `path`.
///
/// The file holds a single JSON array and stays well-formed after every
/// append: the trailing `]` (and any whitespace before it) is stripped and the
/// element is spliced in, or a fresh array is opened for an empty or missing
/// file.
fn append_json_element(path: &Path, element: &[u8]) -> Result<(), WriteError> {
    // The worst case adds the element plus a few framing bytes.
    ensure_capacity(path, element.len() as u64 + 8)?;

    let mut file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut payload = Vec::with_capacity(element.len() + 4);
            payload.extend_from_slice(b"[\n");
            payload.extend_from_slice(element);
            payload.extend_from_slice(b"\n]");
            return create_with(path, &payload);
        }
        Err(source) => {
            return Err(WriteError::UnableToOpenFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let len = file.metadata()?.len();
    if len == 0 {
        file.write_all(b"[\n")?;
        file.write_all(element)?;
        file.write_all(b"\n]")?;
        return Ok(());
    }

    // Scan a small tail window backwards for the closing bracket, widening
    // the window while it holds nothing but whitespace so that a hand-edited
    // file with trailing blank lines still splices correctly.
    let mut window = len.min(64);
    let tail = loop {
        let mut tail = vec![0u8; window as usize];
        file.seek(SeekFrom::Start(len - window))?;
        file.read_exact(&mut tail)?;
        if window == len || tail.iter().any(|byte| !byte.is_ascii_whitespace()) {
            break tail;
        }
        window = window.saturating_mul(2).min(len);
    };

    let closing = tail
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .filter(|&idx| tail[idx] == b']')
        .ok_or_else(|| {
            WriteError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("not a JSON array log file: {}", path.display()),
            ))
        })?;
    let mut cut = closing;
    while cut > 0 && tail[cut - 1].is_ascii_whitespace() {
        cut -= 1;
    }

    file.set_len(len - window + cut as u64)?;
    file.seek(SeekFrom::End(0))?;
    file.write_all(b",\n")?;
    file.write_all(element)?;
    file.write_all(b"\n]")?;
    Ok(())
}

fn create_with(path: &Path, payload: &[u8]) -> Result<(), WriteError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| WriteError::UnableToCreateFile {
            path: path.to_path_buf(),
            source,
        })?;
    file.write_all(payload)?;
    Ok(())
}

/// Checks that the volume containing `path` can take `required` more bytes.
///
/// The check is best-effort: when the platform cannot report free space the
/// write proceeds. On a positive shortage the target file is left untouched.
pub(crate) fn ensure_capacity(path: &Path, required: u64) -> Result<(), WriteError> {
    let probe = if path.exists() {
        path
    } else {
        path.parent().filter(|p| p.exists()).unwrap_or(Path::new("."))
    };
    match fs2::available_space(probe) {
        Ok(available) if available < required => Err(WriteError::NoAvailableStorage {
            path: path.to_path_buf(),
            requested: required,
        }),
        _ => Ok(()),
    }
}
