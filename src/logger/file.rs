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
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;
use std::time::Duration;

use anyhow::Context;

use crate::dispatch;
use crate::dispatch::QueueHandle;
use crate::dispatch::Sink;
use crate::error::WriteError;
use crate::layout::Layout;
use crate::layout::TextLayout;
use crate::registry;
use crate::registry::ChannelRegistry;
use crate::rolling::RolloverPolicy;
use crate::writer;
use crate::writer::Framing;
use crate::Level;
use crate::Logger;
use crate::Record;
use crate::Threshold;

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// A callback receiving write errors, invoked off the write path.
pub type ErrorHook = Arc<dyn Fn(WriteError) + Send + Sync + 'static>;

/// A logger that appends records to a file, rolling it over per policy.
///
/// File loggers default to asynchronous dispatch: `log_message` returns
/// immediately and a dedicated worker performs the write. Dropping the logger
/// drains pending writes within a bounded shutdown timeout. Writers from
/// independent logger instances pointing at the same resolved path serialize
/// through one per-file channel.
///
/// # Examples
///
/// ```no_run
/// use logwheel::rolling::Naming;
/// use logwheel::rolling::RolloverPolicy;
/// use logwheel::FileLogger;
/// use logwheel::Level;
///
/// let logger = FileLogger::builder("logs/app.log")
///     .threshold(Level::Info)
///     .rollover(RolloverPolicy::at_size(1024 * 1024, Naming::sequential_with(5)))
///     .build()
///     .unwrap();
/// ```
pub struct FileLogger {
    backend: Arc<FileBackend>,
    threshold: RwLock<Threshold>,
    dispatch: Option<QueueHandle>,
    shutdown_timeout: Duration,
}

impl FileLogger {
    /// Creates a new [`FileLoggerBuilder`] for the given path.
    pub fn builder(path: impl Into<PathBuf>) -> FileLoggerBuilder {
        FileLoggerBuilder {
            path: path.into(),
            layout: TextLayout::default().no_color().into(),
            threshold: Threshold::AtLeast(Level::Trace),
            policy: RolloverPolicy::Never,
            synchronous: false,
            buffered_lines_limit: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            error_hook: None,
        }
    }

    /// The resolved path of the live log file.
    pub fn path(&self) -> &Path {
        &self.backend.path
    }

    /// Changes the level threshold; the next log call observes it.
    pub fn set_threshold(&self, threshold: impl Into<Threshold>) {
        let mut guard = self.threshold.write().unwrap_or_else(|err| err.into_inner());
        *guard = threshold.into();
    }

    /// Changes the rollover policy; the next write observes it.
    pub fn set_rollover(&self, policy: RolloverPolicy) {
        let mut guard = self
            .backend
            .policy
            .write()
            .unwrap_or_else(|err| err.into_inner());
        *guard = policy;
    }
}

impl Logger for FileLogger {
    fn can_log(&self, level: Level) -> bool {
        let guard = self.threshold.read().unwrap_or_else(|err| err.into_inner());
        guard.passes(level)
    }

    fn log_message(&self, record: &Record) {
        if !self.can_log(record.level) {
            return;
        }
        let bytes = match self.backend.encode(record) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.backend.report(err);
                return;
            }
        };
        match &self.dispatch {
            Some(queue) => queue.send(bytes),
            None => self.backend.consume(&bytes),
        }
    }
}

impl fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLogger")
            .field("path", &self.backend.path)
            .field("synchronous", &self.dispatch.is_none())
            .finish()
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        if let Some(queue) = &self.dispatch {
            queue.drain(self.shutdown_timeout);
        }
    }
}

/// A builder for configuring [`FileLogger`].
pub struct FileLoggerBuilder {
    path: PathBuf,
    layout: Layout,
    threshold: Threshold,
    policy: RolloverPolicy,
    synchronous: bool,
    buffered_lines_limit: Option<usize>,
    shutdown_timeout: Duration,
    error_hook: Option<ErrorHook>,
}

impl FileLoggerBuilder {
    /// Sets the layout used to format records. A JSON layout switches the
    /// file to JSON-array framing.
    pub fn layout(mut self, layout: impl Into<Layout>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Sets the level threshold.
    pub fn threshold(mut self, threshold: impl Into<Threshold>) -> Self {
        self.threshold = threshold.into();
        self
    }

    /// Sets the rollover policy.
    pub fn rollover(mut self, policy: RolloverPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Writes on the calling thread instead of a dedicated worker.
    pub fn synchronous(mut self) -> Self {
        self.synchronous = true;
        self
    }

    /// Bounds the async queue; senders block once the limit is reached.
    pub fn buffered_lines_limit(mut self, limit: usize) -> Self {
        self.buffered_lines_limit = Some(limit);
        self
    }

    /// Bounds the drain wait on drop.
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Registers a callback for write errors. The callback runs off the write
    /// path; without one, errors go to stderr.
    pub fn error_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(WriteError) + Send + Sync + 'static,
    {
        self.error_hook = Some(Arc::new(hook));
        self
    }

    /// Builds the [`FileLogger`], resolving the path and starting the worker
    /// thread for asynchronous loggers.
    pub fn build(self) -> anyhow::Result<FileLogger> {
        let path = registry::resolve_path(&self.path)
            .with_context(|| format!("failed to resolve log file path: {}", self.path.display()))?;

        let framing = self.layout.framing();
        let backend = Arc::new(FileBackend {
            path,
            layout: self.layout,
            framing,
            policy: RwLock::new(self.policy),
            registry: ChannelRegistry::global(),
            error_hook: self.error_hook,
        });

        let dispatch = if self.synchronous {
            None
        } else {
            Some(dispatch::spawn(
                backend.clone(),
                "logwheel-file-writer",
                self.buffered_lines_limit,
            ))
        };

        Ok(FileLogger {
            backend,
            threshold: RwLock::new(self.threshold),
            dispatch,
            shutdown_timeout: self.shutdown_timeout,
        })
    }
}

/// The shared write side of a file logger: everything a write needs that is
/// independent of the dispatch mode.
struct FileBackend {
    path: PathBuf,
    layout: Layout,
    framing: Framing,
    policy: RwLock<RolloverPolicy>,
    registry: &'static ChannelRegistry,
    error_hook: Option<ErrorHook>,
}

impl FileBackend {
    fn encode(&self, record: &Record) -> Result<Vec<u8>, WriteError> {
        let mut bytes = self.layout.format(record)?;
        if self.framing == Framing::Line {
            bytes.push(b'\n');
        }
        Ok(bytes)
    }

    /// Performs the unit of work for one record: under the per-file channel,
    /// evaluate the rollover policy, then append.
    fn write(&self, bytes: &[u8]) -> Result<(), WriteError> {
        let channel = self.registry.acquire(&self.path);
        let _guard = channel.lock().unwrap_or_else(|err| err.into_inner());
        {
            let policy = self.policy.read().unwrap_or_else(|err| err.into_inner());
            policy.maybe_rollover(&self.path)?;
        }
        writer::append(&self.path, bytes, self.framing)
    }

    fn report(&self, err: WriteError) {
        match &self.error_hook {
            Some(hook) => {
                let hook = hook.clone();
                std::thread::spawn(move || hook(err));
            }
            None => eprintln!("failed to write log: {err}"),
        }
    }
}

impl Sink for FileBackend {
    fn consume(&self, bytes: &[u8]) {
        if let Err(err) = self.write(bytes) {
            self.report(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_synchronous_write() {
        let dir = TempDir::new().unwrap();
        let logger = FileLogger::builder(dir.path().join("app.log"))
            .synchronous()
            .build()
            .unwrap();

        logger.log_message(&Record::new(Level::Info, "hello"));
        let contents = fs::read_to_string(logger.path()).unwrap();
        assert!(contents.contains("hello"));
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn test_threshold_mutation() {
        let dir = TempDir::new().unwrap();
        let logger = FileLogger::builder(dir.path().join("app.log"))
            .threshold(Level::Error)
            .synchronous()
            .build()
            .unwrap();

        logger.log_message(&Record::new(Level::Info, "dropped"));
        assert!(!logger.path().exists());

        logger.set_threshold(Level::Info);
        logger.log_message(&Record::new(Level::Info, "kept"));
        assert!(fs::read_to_string(logger.path()).unwrap().contains("kept"));
    }

    #[test]
    fn test_policy_swap_takes_effect_on_next_write() {
        let dir = TempDir::new().unwrap();
        let logger = FileLogger::builder(dir.path().join("app.log"))
            .synchronous()
            .build()
            .unwrap();

        logger.log_message(&Record::new(Level::Info, "first"));
        logger.set_rollover(RolloverPolicy::at_size(
            1,
            crate::rolling::Naming::sequential(),
        ));
        logger.log_message(&Record::new(Level::Info, "second"));

        assert!(dir.path().join("app.1.log").exists());
        let live = fs::read_to_string(logger.path()).unwrap();
        assert!(live.contains("second"));
        assert!(!live.contains("first"));
    }

    #[cfg(unix)]
    #[test]
    fn test_error_hook_receives_write_failure() {
        use std::os::unix::fs::PermissionsExt;
        use std::sync::mpsc;

        let dir = TempDir::new().unwrap();
        let sealed = dir.path().join("sealed");
        fs::create_dir(&sealed).unwrap();

        let (sender, receiver) = mpsc::channel();
        let logger = FileLogger::builder(sealed.join("app.log"))
            .synchronous()
            .error_hook(move |err| {
                let _ = sender.send(err);
            })
            .build()
            .unwrap();

        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o555)).unwrap();
        logger.log_message(&Record::new(Level::Info, "blocked"));

        let err = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(err, WriteError::UnableToCreateFile { .. }));

        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
