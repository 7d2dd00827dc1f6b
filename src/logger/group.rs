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

use crate::Level;
use crate::Logger;
use crate::Record;

/// A fan-out logger broadcasting every record to a set of child loggers.
///
/// [`GroupLogger::can_log`] is the logical OR over the children; each child
/// applies its own threshold again when the record is forwarded.
#[derive(Debug, Default)]
pub struct GroupLogger {
    children: Vec<Box<dyn Logger>>,
}

impl GroupLogger {
    pub fn new() -> GroupLogger {
        GroupLogger { children: vec![] }
    }

    /// Adds a child logger.
    pub fn with(mut self, logger: impl Logger) -> GroupLogger {
        self.children.push(Box::new(logger));
        self
    }
}

impl Logger for GroupLogger {
    fn can_log(&self, level: Level) -> bool {
        self.children.iter().any(|child| child.can_log(level))
    }

    fn log_message(&self, record: &Record) {
        for child in &self.children {
            child.log_message(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::FileLogger;

    use super::*;

    #[test]
    fn test_can_log_is_or_over_children() {
        let dir = TempDir::new().unwrap();
        let errors = FileLogger::builder(dir.path().join("errors.log"))
            .threshold(Level::Error)
            .synchronous()
            .build()
            .unwrap();
        let all = FileLogger::builder(dir.path().join("all.log"))
            .threshold(Level::Info)
            .synchronous()
            .build()
            .unwrap();

        let group = GroupLogger::new().with(errors).with(all);
        assert!(group.can_log(Level::Info));
        assert!(group.can_log(Level::Error));
        assert!(!group.can_log(Level::Debug));
    }

    #[test]
    fn test_children_filter_independently() {
        let dir = TempDir::new().unwrap();
        let errors_path = dir.path().join("errors.log");
        let all_path = dir.path().join("all.log");

        let errors = FileLogger::builder(&errors_path)
            .threshold(Level::Error)
            .synchronous()
            .build()
            .unwrap();
        let all = FileLogger::builder(&all_path)
            .threshold(Level::Info)
            .synchronous()
            .build()
            .unwrap();
        let group = GroupLogger::new().with(errors).with(all);

        group.log_message(&Record::new(Level::Warn, "only one write"));

        assert!(!errors_path.exists());
        let written = fs::read_to_string(&all_path).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("only one write"));
    }
}
