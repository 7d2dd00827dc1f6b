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

use jiff::Zoned;

use crate::Level;

/// A single log event.
///
/// A record is built at the moment a log call is made, carries the call-site
/// metadata along with the message, and is consumed by the backends it is
/// dispatched to.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: Zoned,
    pub level: Level,
    pub message: String,
    pub module: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: Option<String>,
    pub process_id: u32,
    pub process_name: String,
    pub thread: Option<String>,
    pub kvs: Vec<(String, String)>,
}

impl Record {
    /// Creates a new record with the current timestamp and process/thread
    /// identity filled in.
    pub fn new(level: Level, message: impl Into<String>) -> Record {
        Record {
            timestamp: Zoned::now(),
            level,
            message: message.into(),
            module: None,
            file: None,
            line: None,
            function: None,
            process_id: std::process::id(),
            process_name: process_name(),
            thread: std::thread::current().name().map(str::to_string),
            kvs: vec![],
        }
    }

    /// Sets the originating source module.
    pub fn with_module(mut self, module: impl Into<String>) -> Record {
        self.module = Some(module.into());
        self
    }

    /// Sets the call-site file and line.
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Record {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Sets the call-site function name.
    pub fn with_function(mut self, function: impl Into<String>) -> Record {
        self.function = Some(function.into());
        self
    }

    /// Attaches a key-value pair of free-form metadata.
    pub fn with_kv(mut self, key: impl Into<String>, value: impl Into<String>) -> Record {
        self.kvs.push((key.into(), value.into()));
        self
    }
}

fn process_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults() {
        let record = Record::new(Level::Info, "hello");
        assert_eq!(record.level, Level::Info);
        assert_eq!(record.message, "hello");
        assert_eq!(record.process_id, std::process::id());
        assert!(record.kvs.is_empty());
    }

    #[test]
    fn test_record_builders() {
        let record = Record::new(Level::Warn, "careful")
            .with_module("engine")
            .with_location("engine.rs", 42)
            .with_function("start")
            .with_kv("request", "abc");
        assert_eq!(record.module.as_deref(), Some("engine"));
        assert_eq!(record.file.as_deref(), Some("engine.rs"));
        assert_eq!(record.line, Some(42));
        assert_eq!(record.function.as_deref(), Some("start"));
        assert_eq!(record.kvs, vec![("request".to_string(), "abc".to_string())]);
    }
}
