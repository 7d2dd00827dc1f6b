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

/// An ordered log severity.
///
/// From least to most severe, the levels are:
///
/// - `Trace`
/// - `Debug`
/// - `Info`
/// - `Warn`
/// - `Error`
///
/// [`Level::Off`] is a sentinel that is greater than every real level. It is
/// never attached to a record; used as a threshold it disables a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl Level {
    /// The numeric score of the level, usable for `>=` comparisons.
    pub fn score(self) -> u8 {
        self as u8
    }

    /// The lowercase canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }

    /// The uppercase display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    /// An optional decoration symbol, used by console output.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Level::Trace => None,
            Level::Debug => Some("◽"),
            Level::Info => Some("🔹"),
            Level::Warn => Some("⚠️"),
            Level::Error => Some("❗"),
            Level::Off => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Trace,
        }
    }
}

/// The level comparison policy of a logger.
///
/// `AtLeast` is the usual threshold comparison; `Exactly` accepts one single
/// level, for loggers dedicated to a specific severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    AtLeast(Level),
    Exactly(Level),
}

impl Threshold {
    pub fn passes(&self, level: Level) -> bool {
        match *self {
            Threshold::AtLeast(min) => level >= min && level != Level::Off,
            Threshold::Exactly(wanted) => level == wanted,
        }
    }
}

impl From<Level> for Threshold {
    fn from(level: Level) -> Self {
        Threshold::AtLeast(level)
    }
}
