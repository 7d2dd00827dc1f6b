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

use std::fmt;
use std::fs;
use std::path::Path;

use jiff::tz::TimeZone;
use jiff::Timestamp;
use jiff::Zoned;

use crate::error::WriteError;
use crate::rolling::Naming;

/// The trigger deciding when the live log file is rolled over.
///
/// The policy is evaluated before each append, under the per-file channel, so
/// the rollover and the append of one record are atomic relative to other
/// writers of the same file.
pub enum RolloverPolicy {
    /// Never roll over.
    Never,
    /// Roll over once the live file has reached `threshold` bytes.
    AtSize { threshold: u64, naming: Naming },
    /// Roll over when the live file was last modified on the current local
    /// calendar day.
    EachDay { naming: Naming },
    /// Roll over when the live file was last modified in the current local
    /// calendar hour.
    EachHour { naming: Naming },
    /// Roll over when the predicate returns true for the live file.
    Custom {
        predicate: Box<dyn Fn(&Path) -> bool + Send + Sync>,
        naming: Naming,
    },
}

impl RolloverPolicy {
    pub fn at_size(threshold: u64, naming: Naming) -> RolloverPolicy {
        RolloverPolicy::AtSize { threshold, naming }
    }

    pub fn each_day(naming: Naming) -> RolloverPolicy {
        RolloverPolicy::EachDay { naming }
    }

    pub fn each_hour(naming: Naming) -> RolloverPolicy {
        RolloverPolicy::EachHour { naming }
    }

    pub fn custom<F>(predicate: F, naming: Naming) -> RolloverPolicy
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        RolloverPolicy::Custom {
            predicate: Box::new(predicate),
            naming,
        }
    }

    /// Evaluates the trigger for `path` and delegates to the naming strategy
    /// when it fires. Everything up to that delegation is a pure read.
    pub(crate) fn maybe_rollover(&self, path: &Path) -> Result<(), WriteError> {
        match self {
            RolloverPolicy::Never => Ok(()),
            RolloverPolicy::AtSize { threshold, naming } => {
                let Ok(metadata) = fs::metadata(path) else {
                    return Ok(());
                };
                if metadata.len() >= *threshold {
                    naming.rollover(path)?;
                }
                Ok(())
            }
            RolloverPolicy::EachDay { naming } => {
                if modified_in_current_bucket(path, Bucket::Day) {
                    naming.rollover(path)?;
                }
                Ok(())
            }
            RolloverPolicy::EachHour { naming } => {
                if modified_in_current_bucket(path, Bucket::Hour) {
                    naming.rollover(path)?;
                }
                Ok(())
            }
            RolloverPolicy::Custom { predicate, naming } => {
                if predicate(path) {
                    naming.rollover(path)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for RolloverPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RolloverPolicy::Never => f.write_str("Never"),
            RolloverPolicy::AtSize { threshold, naming } => f
                .debug_struct("AtSize")
                .field("threshold", threshold)
                .field("naming", naming)
                .finish(),
            RolloverPolicy::EachDay { naming } => {
                f.debug_struct("EachDay").field("naming", naming).finish()
            }
            RolloverPolicy::EachHour { naming } => {
                f.debug_struct("EachHour").field("naming", naming).finish()
            }
            RolloverPolicy::Custom { naming, .. } => {
                f.debug_struct("Custom").field("naming", naming).finish()
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Bucket {
    Day,
    Hour,
}

/// Whether `path` was last modified in the current local day or hour.
///
/// Note the direction: the trigger fires when the modification time falls in
/// the *current* bucket, i.e. for a file already touched today, not for one
/// left over from before a boundary. Missing or unreadable files never fire.
fn modified_in_current_bucket(path: &Path, bucket: Bucket) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    let Ok(modified) = Timestamp::try_from(modified) else {
        return false;
    };

    let tz = TimeZone::system();
    let modified = modified.to_zoned(tz.clone());
    let now = Zoned::now().with_time_zone(tz);

    match bucket {
        Bucket::Day => modified.date() == now.date(),
        Bucket::Hour => modified.date() == now.date() && modified.hour() == now.hour(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_never_is_noop() {
        let dir = TempDir::new().unwrap();
        let live = dir.path().join("file.log");
        fs::write(&live, "x").unwrap();
        RolloverPolicy::Never.maybe_rollover(&live).unwrap();
        assert!(live.exists());
    }

    #[test]
    fn test_at_size_below_threshold() {
        let dir = TempDir::new().unwrap();
        let live = dir.path().join("file.log");
        fs::write(&live, "tiny").unwrap();

        let policy = RolloverPolicy::at_size(1000, Naming::sequential());
        policy.maybe_rollover(&live).unwrap();
        assert!(live.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_at_size_fires_at_threshold() {
        let dir = TempDir::new().unwrap();
        let live = dir.path().join("file.log");
        fs::write(&live, [b'x'; 100]).unwrap();

        let policy = RolloverPolicy::at_size(100, Naming::sequential());
        policy.maybe_rollover(&live).unwrap();
        assert!(!live.exists());
        assert!(dir.path().join("file.1.log").exists());
    }

    #[test]
    fn test_at_size_absent_file_is_noop() {
        let dir = TempDir::new().unwrap();
        let live = dir.path().join("absent.log");
        let policy = RolloverPolicy::at_size(0, Naming::sequential());
        policy.maybe_rollover(&live).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_each_day_fires_for_file_touched_today() {
        let dir = TempDir::new().unwrap();
        let live = dir.path().join("file.log");
        fs::write(&live, "written moments ago").unwrap();

        let policy = RolloverPolicy::each_day(Naming::sequential());
        policy.maybe_rollover(&live).unwrap();
        // The file was modified today, so the trigger fires.
        assert!(!live.exists());
        assert!(dir.path().join("file.1.log").exists());
    }

    #[test]
    fn test_each_hour_fires_for_file_touched_this_hour() {
        let dir = TempDir::new().unwrap();
        let live = dir.path().join("file.log");
        fs::write(&live, "written moments ago").unwrap();

        let policy = RolloverPolicy::each_hour(Naming::sequential());
        policy.maybe_rollover(&live).unwrap();
        assert!(!live.exists());
        assert!(dir.path().join("file.1.log").exists());
    }

    #[test]
    fn test_each_hour_skips_file_from_an_earlier_hour() {
        use std::time::Duration;
        use std::time::SystemTime;

        let dir = TempDir::new().unwrap();
        let live = dir.path().join("file.log");
        fs::write(&live, "stale").unwrap();
        let file = fs::File::options().write(true).open(&live).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(2 * 60 * 60))
            .unwrap();
        drop(file);

        let policy = RolloverPolicy::each_hour(Naming::sequential());
        policy.maybe_rollover(&live).unwrap();
        assert!(live.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_each_day_absent_file_is_noop() {
        let dir = TempDir::new().unwrap();
        let live = dir.path().join("absent.log");
        let policy = RolloverPolicy::each_day(Naming::sequential());
        policy.maybe_rollover(&live).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_custom_predicate() {
        let dir = TempDir::new().unwrap();
        let live = dir.path().join("file.log");
        fs::write(&live, "x").unwrap();

        let policy = RolloverPolicy::custom(|_| false, Naming::sequential());
        policy.maybe_rollover(&live).unwrap();
        assert!(live.exists());

        let policy = RolloverPolicy::custom(|_| true, Naming::sequential());
        policy.maybe_rollover(&live).unwrap();
        assert!(!live.exists());
        assert!(dir.path().join("file.1.log").exists());
    }
}
