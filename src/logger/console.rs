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

use std::io::Write;
use std::sync::RwLock;

use crate::layout::TextLayout;
use crate::Level;
use crate::Logger;
use crate::Record;
use crate::Threshold;

/// A logger that prints records to stdout.
///
/// Console output is synchronous: the write happens on the calling thread, so
/// lines from different threads appear in call order without extra buffering.
#[derive(Debug)]
pub struct ConsoleLogger {
    layout: TextLayout,
    threshold: RwLock<Threshold>,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(Level::Trace)
    }
}

impl ConsoleLogger {
    pub fn new(threshold: impl Into<Threshold>) -> ConsoleLogger {
        ConsoleLogger {
            layout: TextLayout::default().symbols(),
            threshold: RwLock::new(threshold.into()),
        }
    }

    /// Replaces the text layout.
    pub fn with_layout(mut self, layout: TextLayout) -> ConsoleLogger {
        self.layout = layout;
        self
    }

    /// Changes the level threshold; the next log call observes it.
    pub fn set_threshold(&self, threshold: impl Into<Threshold>) {
        let mut guard = self.threshold.write().unwrap_or_else(|err| err.into_inner());
        *guard = threshold.into();
    }
}

impl Logger for ConsoleLogger {
    fn can_log(&self, level: Level) -> bool {
        let guard = self.threshold.read().unwrap_or_else(|err| err.into_inner());
        guard.passes(level)
    }

    fn log_message(&self, record: &Record) {
        if !self.can_log(record.level) {
            return;
        }
        match self.layout.format(record) {
            Ok(mut bytes) => {
                bytes.push(b'\n');
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                let _ = handle.write_all(&bytes);
            }
            Err(err) => eprintln!("failed to format log record: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_filtering() {
        let logger = ConsoleLogger::new(Level::Warn);
        assert!(!logger.can_log(Level::Info));
        assert!(logger.can_log(Level::Warn));
        assert!(logger.can_log(Level::Error));

        logger.set_threshold(Level::Off);
        assert!(!logger.can_log(Level::Error));
    }
}
