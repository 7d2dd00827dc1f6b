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

//! The per-file write channel registry.
//!
//! All writers targeting the same physical file must serialize through one
//! channel, no matter how many logger instances point at that path. The
//! registry keys channels by canonical resolved paths so that different
//! spellings of one file (relative path, symlink, `~`) collide on one entry.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;
use std::time::Instant;

const SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);
const IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// The serialization channel for one resolved file path.
///
/// Locking the channel grants exclusive access to the file for one unit of
/// work (rollover check plus append).
pub(crate) type FileChannel = Arc<Mutex<()>>;

struct Entry {
    channel: FileChannel,
    last_access: Instant,
}

struct Inner {
    channels: HashMap<PathBuf, Entry>,
    last_sweep: Instant,
}

/// A registry mapping resolved paths to per-file channels.
///
/// One process-wide instance lives behind [`ChannelRegistry::global`];
/// constructing separate registries is only useful for tests.
pub(crate) struct ChannelRegistry {
    inner: Mutex<Inner>,
    sweep_interval: Duration,
    idle_timeout: Duration,
}

impl ChannelRegistry {
    pub(crate) fn new() -> ChannelRegistry {
        ChannelRegistry::with_timeouts(SWEEP_INTERVAL, IDLE_TIMEOUT)
    }

    fn with_timeouts(sweep_interval: Duration, idle_timeout: Duration) -> ChannelRegistry {
        ChannelRegistry {
            inner: Mutex::new(Inner {
                channels: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            sweep_interval,
            idle_timeout,
        }
    }

    /// The process-wide registry, created on first use.
    pub(crate) fn global() -> &'static ChannelRegistry {
        static GLOBAL: OnceLock<ChannelRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ChannelRegistry::new)
    }

    /// Returns the channel for `path`, creating it if absent and refreshing
    /// its last-access time. Lookup, refresh, and insert happen atomically
    /// under the registry lock; the lock is never held across file I/O.
    ///
    /// There is no timer thread, so idle entries are swept opportunistically
    /// here once enough wall-clock time has passed.
    pub(crate) fn acquire(&self, path: &Path) -> FileChannel {
        let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());

        if inner.last_sweep.elapsed() >= self.sweep_interval {
            let idle_timeout = self.idle_timeout;
            inner.channels.retain(|_, entry| {
                // An entry still held by a writer must survive, or a second
                // channel could appear for the same path.
                entry.last_access.elapsed() < idle_timeout
                    || Arc::strong_count(&entry.channel) > 1
            });
            inner.last_sweep = Instant::now();
        }

        let entry = inner
            .channels
            .entry(path.to_path_buf())
            .or_insert_with(|| Entry {
                channel: Arc::new(Mutex::new(())),
                last_access: Instant::now(),
            });
        entry.last_access = Instant::now();
        entry.channel.clone()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());
        inner.channels.len()
    }
}

/// Resolves `path` to its canonical absolute form: expands a leading `~`,
/// creates missing parent directories, and resolves symlinks.
pub(crate) fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let expanded = expand_tilde(path);

    match fs::canonicalize(&expanded) {
        Ok(resolved) => Ok(resolved),
        Err(_) => {
            // The file does not exist yet. Canonicalize its parent so the
            // registry key is still symlink-free.
            let file_name = expanded.file_name().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("path has no file name: {}", expanded.display()),
                )
            })?;
            let parent = match expanded.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            fs::create_dir_all(&parent)?;
            Ok(fs::canonicalize(parent)?.join(file_name))
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    if text == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    } else if let Some(rest) = text.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_same_path_yields_same_channel() {
        let registry = ChannelRegistry::new();
        let a = registry.acquire(Path::new("/tmp/some/file.log"));
        let b = registry.acquire(Path::new("/tmp/some/file.log"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_different_spellings_resolve_to_one_key() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("file.log"), "x").unwrap();

        let direct = resolve_path(&dir.path().join("file.log")).unwrap();
        let dotted = resolve_path(&dir.path().join(".").join("file.log")).unwrap();
        assert_eq!(direct, dotted);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_paths_resolve_to_one_key() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("file.log"), "x").unwrap();
        let link = dir.path().join("alias.log");
        std::os::unix::fs::symlink(dir.path().join("file.log"), &link).unwrap();

        let direct = resolve_path(&dir.path().join("file.log")).unwrap();
        let via_link = resolve_path(&link).unwrap();
        assert_eq!(direct, via_link);
    }

    #[test]
    fn test_resolve_missing_file_uses_parent() {
        let dir = TempDir::new().unwrap();
        let resolved = resolve_path(&dir.path().join("logs").join("new.log")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.parent().unwrap().is_dir());
        assert_eq!(resolved.file_name().unwrap(), "new.log");
    }

    #[test]
    fn test_idle_entries_are_swept() {
        let registry =
            ChannelRegistry::with_timeouts(Duration::from_millis(10), Duration::from_millis(10));
        drop(registry.acquire(Path::new("/tmp/idle.log")));
        assert_eq!(registry.len(), 1);

        std::thread::sleep(Duration::from_millis(20));
        drop(registry.acquire(Path::new("/tmp/other.log")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_held_channels_survive_the_sweep() {
        let registry =
            ChannelRegistry::with_timeouts(Duration::from_millis(10), Duration::from_millis(10));
        let held = registry.acquire(Path::new("/tmp/held.log"));
        assert_eq!(registry.len(), 1);

        std::thread::sleep(Duration::from_millis(20));
        let again = registry.acquire(Path::new("/tmp/held.log"));
        assert!(Arc::ptr_eq(&held, &again));
    }
}
