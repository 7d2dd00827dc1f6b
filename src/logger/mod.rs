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

//! Concrete loggers and the capability trait they share.

use std::fmt;

pub use console::ConsoleLogger;
pub use file::ErrorHook;
pub use file::FileLogger;
pub use file::FileLoggerBuilder;
pub use group::GroupLogger;

mod console;
mod file;
mod group;

use crate::Level;
use crate::Record;

/// A destination for log records.
///
/// Implementors decide whether a level passes their threshold and how a record
/// is persisted. Fan-out and filtering logic query [`Logger::can_log`] without
/// performing a write.
pub trait Logger: fmt::Debug + Send + Sync + 'static {
    /// Whether a record at `level` would be written.
    fn can_log(&self, level: Level) -> bool;

    /// Processes one log record. Records below the threshold are discarded
    /// before any work is queued.
    fn log_message(&self, record: &Record);
}
