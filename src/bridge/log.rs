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

//! Bridge to the [`log`] crate.
//!
//! Installing a logger here makes `log::info!` and friends the per-call entry
//! point: the macros capture module, file, line, and key-values at the call
//! site, and the bridge converts each [`log::Record`] into a [`Record`].

use crate::error::SetupError;
use crate::Level;
use crate::Logger;
use crate::Record;

/// Sets `logger` as the global [`log`] logger.
///
/// # Errors
///
/// Fails if a global logger has already been installed.
///
/// # Examples
///
/// ```
/// use logwheel::ConsoleLogger;
/// use logwheel::Level;
///
/// logwheel::bridge::install(ConsoleLogger::new(Level::Info)).unwrap();
/// log::info!("bridged");
/// ```
pub fn install(logger: impl Logger) -> Result<(), SetupError> {
    log::set_boxed_logger(Box::new(LogBridge {
        inner: Box::new(logger),
    }))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

struct LogBridge {
    inner: Box<dyn Logger>,
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.can_log(Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.inner.log_message(&convert(record));
    }

    fn flush(&self) {}
}

fn convert(record: &log::Record) -> Record {
    let mut kvs = vec![];
    let mut collector = KvCollector { kvs: &mut kvs };
    let _ = record.key_values().visit(&mut collector);

    let mut converted = Record::new(Level::from(record.level()), record.args().to_string());
    if let Some(module) = record.module_path() {
        converted = converted.with_module(module);
    }
    if let (Some(file), Some(line)) = (record.file(), record.line()) {
        converted = converted.with_location(file, line);
    }
    converted.kvs = kvs;
    converted
}

struct KvCollector<'a> {
    kvs: &'a mut Vec<(String, String)>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KvCollector<'_> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.kvs.push((key.to_string(), value.to_string()));
        Ok(())
    }
}
