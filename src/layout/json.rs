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

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::Map;
use serde_json::Value;

use crate::error::WriteError;
use crate::layout::Layout;
use crate::Record;

/// A layout that formats each log record as one JSON object.
///
/// The default projection uses the keys `timestamp`, `level`, `message`,
/// `module`, `file`, `line`, `function`, `pid`, `process`, `thread`, and
/// `kvs`. A key allowlist restricts the projection to a subset, and a rename
/// table maps default keys to caller-chosen names.
///
/// # Examples
///
/// ```
/// use logwheel::layout::JsonLayout;
///
/// let layout = JsonLayout::default()
///     .keys(["timestamp", "level", "message"])
///     .rename("message", "msg");
/// ```
#[derive(Default, Debug, Clone)]
pub struct JsonLayout {
    keys: Option<BTreeSet<String>>,
    renames: BTreeMap<String, String>,
}

impl JsonLayout {
    /// Restricts the output to the given default keys.
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Renames a default key in the output.
    pub fn rename(mut self, key: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(key.into(), to.into());
        self
    }

    pub(crate) fn format(&self, record: &Record) -> Result<Vec<u8>, WriteError> {
        let mut object = Map::new();
        self.put(&mut object, "timestamp", format!("{:.6}", record.timestamp).into());
        self.put(&mut object, "level", record.level.as_str().into());
        self.put(&mut object, "message", record.message.clone().into());
        self.put(&mut object, "module", optional(record.module.as_deref()));
        self.put(&mut object, "file", optional(record.file.as_deref()));
        self.put(&mut object, "line", record.line.map(Value::from).unwrap_or(Value::Null));
        self.put(&mut object, "function", optional(record.function.as_deref()));
        self.put(&mut object, "pid", record.process_id.into());
        self.put(&mut object, "process", record.process_name.clone().into());
        self.put(&mut object, "thread", optional(record.thread.as_deref()));

        let kvs = record
            .kvs
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(value.clone())))
            .collect::<Map<_, _>>();
        self.put(&mut object, "kvs", Value::Object(kvs));

        serde_json::to_vec(&Value::Object(object))
            .map_err(|err| WriteError::UnableToConvertToBytes(err.to_string()))
    }

    fn put(&self, object: &mut Map<String, Value>, key: &str, value: Value) {
        if let Some(keys) = &self.keys {
            if !keys.contains(key) {
                return;
            }
        }
        let key = self.renames.get(key).cloned().unwrap_or_else(|| key.to_string());
        object.insert(key, value);
    }
}

fn optional(value: Option<&str>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

impl From<JsonLayout> for Layout {
    fn from(layout: JsonLayout) -> Self {
        Layout::Json(layout)
    }
}

#[cfg(test)]
mod tests {
    use crate::Level;

    use super::*;

    #[test]
    fn test_default_projection() {
        let record = Record::new(Level::Error, "boom")
            .with_module("engine")
            .with_kv("attempt", "3");
        let bytes = JsonLayout::default().format(&record).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["message"], "boom");
        assert_eq!(parsed["module"], "engine");
        assert_eq!(parsed["pid"], std::process::id());
        assert_eq!(parsed["kvs"]["attempt"], "3");
    }

    #[test]
    fn test_allowlist_and_rename() {
        let record = Record::new(Level::Info, "hello");
        let layout = JsonLayout::default()
            .keys(["level", "message"])
            .rename("message", "msg");
        let bytes = layout.format(&record).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();

        let object = parsed.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["msg"], "hello");
    }
}
