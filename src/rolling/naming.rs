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

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use jiff::civil;
use jiff::fmt::strtime;
use jiff::Zoned;

use crate::error::WriteError;

/// The naming strategy for archived log files.
///
/// A strategy computes the destination name of a rolled-over file and enforces
/// an optional retention cap on the archives it has produced.
///
/// # Examples
///
/// ```
/// use logwheel::rolling::Naming;
///
/// let capped = Naming::sequential_with(5);
/// let dated = Naming::date("%Y-%m-%d");
/// ```
#[derive(Debug, Clone)]
pub enum Naming {
    /// Archives are named `<base>.<N>.<ext>` with a cascading shift so that an
    /// existing archive is never overwritten.
    Sequential { max_files: Option<usize> },
    /// Archives embed a formatted timestamp: `<base>.<formatted-date>.<ext>`.
    /// Rollovers landing in the same formatted bucket are concatenated.
    Date {
        format: String,
        max_files: Option<usize>,
    },
}

impl Naming {
    /// Sequential naming without a retention cap.
    pub fn sequential() -> Naming {
        Naming::Sequential { max_files: None }
    }

    /// Sequential naming keeping at most `max_files` files (archives plus the
    /// live file).
    pub fn sequential_with(max_files: usize) -> Naming {
        Naming::Sequential {
            max_files: Some(max_files),
        }
    }

    /// Date-based naming with a `strftime`-style format, without a cap.
    pub fn date(format: impl Into<String>) -> Naming {
        Naming::Date {
            format: format.into(),
            max_files: None,
        }
    }

    /// Date-based naming keeping at most `max_files` files.
    pub fn date_with(format: impl Into<String>, max_files: usize) -> Naming {
        Naming::Date {
            format: format.into(),
            max_files: Some(max_files),
        }
    }

    /// Archives the live file at `path` under this strategy and prunes old
    /// archives beyond the retention cap.
    ///
    /// Filesystem failures propagate to the caller; nothing is swallowed here.
    pub(crate) fn rollover(&self, path: &Path) -> Result<(), WriteError> {
        match self {
            Naming::Sequential { max_files } => {
                shift(path)?;
                if let Some(max) = max_files {
                    prune(path, *max, |name| sequence_of(path, name))?;
                }
                Ok(())
            }
            Naming::Date { format, max_files } => {
                rollover_dated(path, format)?;
                if let Some(max) = max_files {
                    prune(path, *max, |name| date_of(path, format, name))?;
                }
                Ok(())
            }
        }
    }
}

/// Moves `path` to the next name in its sequence. If that name is taken, the
/// occupant is shifted first, recursively, so the chain `file.1.log`,
/// `file.2.log`, ... moves up by one instead of being overwritten.
fn shift(path: &Path) -> Result<(), WriteError> {
    let dest = next_in_sequence(path);
    if dest.exists() {
        shift(&dest)?;
    }
    fs::rename(path, &dest).map_err(|source| WriteError::UnableToOpenFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Computes the successor of `path` in its sequence: `file.log` becomes
/// `file.1.log`, `file.3.log` becomes `file.4.log`.
fn next_in_sequence(path: &Path) -> PathBuf {
    let ext = path.extension().and_then(OsStr::to_str);
    let stem = path.file_stem().and_then(OsStr::to_str).unwrap_or_default();

    // No real extension: a trailing numeric segment is the sequence itself.
    if let Some(seq) = ext.and_then(|e| e.parse::<u64>().ok()) {
        return path.with_file_name(format!("{stem}.{}", seq + 1));
    }

    let inner = Path::new(stem);
    let (base, seq) = match inner
        .extension()
        .and_then(OsStr::to_str)
        .and_then(|s| s.parse::<u64>().ok())
    {
        Some(n) => (
            inner.file_stem().and_then(OsStr::to_str).unwrap_or(stem),
            n,
        ),
        None => (stem, 0),
    };

    let name = match ext {
        Some(ext) => format!("{base}.{}.{ext}", seq + 1),
        None => format!("{base}.{}", seq + 1),
    };
    path.with_file_name(name)
}

fn rollover_dated(path: &Path, format: &str) -> Result<(), WriteError> {
    let now = Zoned::now();
    let stamp = strtime::format(format, &now)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let ext = path.extension().and_then(OsStr::to_str);
    let stem = path.file_stem().and_then(OsStr::to_str).unwrap_or_default();
    let name = match ext {
        Some(ext) => format!("{stem}.{stamp}.{ext}"),
        None => format!("{stem}.{stamp}"),
    };
    let dest = path.with_file_name(name);

    if dest.exists() {
        // Another rollover already landed in this time bucket: concatenate
        // instead of overwriting.
        let mut source = fs::File::open(path).map_err(|source| WriteError::UnableToOpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = OpenOptions::new().append(true).open(&dest).map_err(|source| {
            WriteError::UnableToOpenFile {
                path: dest.clone(),
                source,
            }
        })?;
        io::copy(&mut source, &mut archive)?;
        fs::remove_file(path)?;
    } else {
        fs::rename(path, &dest).map_err(|source| WriteError::UnableToOpenFile {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Deletes archives of `live` beyond the top `max - 1`, under the ordering
/// given by `key`: parseable keys ascending, unparseable names after them in
/// lexical order, then the whole list reversed so the highest keys come first.
///
/// For sequential archives the retained set is the highest-numbered files.
/// Under the cascade shift those hold the oldest payloads, so the cap bounds
/// disk usage by sequence position, not by payload recency; unparseable names
/// are pruned before any parseable one.
fn prune<K, F>(live: &Path, max: usize, key: F) -> Result<(), WriteError>
where
    K: Ord,
    F: Fn(&str) -> Option<K>,
{
    let parent = live.parent().unwrap_or_else(|| Path::new("."));
    let stem = live.file_stem().and_then(OsStr::to_str).unwrap_or_default();
    let live_name = live.file_name().and_then(OsStr::to_str).unwrap_or_default();

    let mut archives = fs::read_dir(parent)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if !entry.metadata().ok()?.is_file() {
                return None;
            }
            let name = entry.file_name();
            let name = name.to_str()?;
            if name == live_name || !name.starts_with(stem) {
                return None;
            }
            let key = key(name);
            Some((name.to_string(), key))
        })
        .collect::<Vec<_>>();

    archives.sort_by(|(a_name, a_key), (b_name, b_key)| match (a_key, b_key) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a_name.cmp(b_name),
    });
    archives.reverse();

    for (name, _) in archives.iter().skip(max.saturating_sub(1)) {
        fs::remove_file(parent.join(name))?;
    }
    Ok(())
}

/// Extracts the archive infix of `name`, the part between the live stem and
/// the extension: `file.3.log` yields `3` for a live file `file.log`.
fn archive_infix<'a>(live: &Path, name: &'a str) -> Option<&'a str> {
    let stem = live.file_stem().and_then(OsStr::to_str)?;
    let rest = name.strip_prefix(stem)?.strip_prefix('.')?;
    match live.extension().and_then(OsStr::to_str) {
        Some(ext) => rest.strip_suffix(ext)?.strip_suffix('.'),
        None => Some(rest),
    }
}

fn sequence_of(live: &Path, name: &str) -> Option<u64> {
    archive_infix(live, name)?.parse().ok()
}

fn date_of(live: &Path, format: &str, name: &str) -> Option<civil::DateTime> {
    let infix = archive_infix(live, name)?;
    let broken = strtime::parse(format, infix).ok()?;
    broken.to_datetime().ok().or_else(|| {
        broken
            .to_date()
            .ok()
            .map(|date| date.to_datetime(civil::Time::midnight()))
    })
}
