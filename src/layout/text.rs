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

use colored::Color;
use colored::ColoredString;
use colored::Colorize;
use jiff::fmt::strtime;

use crate::error::WriteError;
use crate::layout::Layout;
use crate::Level;
use crate::Record;

/// A layout that formats log records as text lines.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172105+08:00  WARN engine: src/engine.rs:52 cache is cold
/// ```
///
/// Level coloring is on by default and meant for console output; file loggers
/// use [`TextLayout::no_color`]. The timestamp format is a `strftime` string.
#[derive(Debug, Clone)]
pub struct TextLayout {
    colors: Option<LevelColor>,
    symbols: bool,
    date_format: String,
}

/// Customize the color of each log level.
#[derive(Debug, Clone)]
pub struct LevelColor {
    pub error: Color,
    pub warn: Color,
    pub info: Color,
    pub debug: Color,
    pub trace: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            error: Color::Red,
            warn: Color::Yellow,
            info: Color::Green,
            debug: Color::Blue,
            trace: Color::Magenta,
        }
    }
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            colors: Some(LevelColor::default()),
            symbols: false,
            date_format: "%Y-%m-%dT%H:%M:%S.%6f%:z".to_string(),
        }
    }
}

impl TextLayout {
    /// Turns off level coloring.
    pub fn no_color(mut self) -> Self {
        self.colors = None;
        self
    }

    /// Prefixes each line with the level's decoration symbol, if it has one.
    pub fn symbols(mut self) -> Self {
        self.symbols = true;
        self
    }

    /// Sets the `strftime` format used for the timestamp.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub(crate) fn format(&self, record: &Record) -> Result<Vec<u8>, WriteError> {
        let time = strtime::format(&self.date_format, &record.timestamp)
            .map_err(|err| WriteError::UnableToConvertToBytes(err.to_string()))?;

        let level = match &self.colors {
            Some(colors) => {
                let color = match record.level {
                    Level::Error => colors.error,
                    Level::Warn => colors.warn,
                    Level::Info => colors.info,
                    Level::Debug => colors.debug,
                    Level::Trace | Level::Off => colors.trace,
                };
                ColoredString::from(record.level.as_str()).color(color).to_string()
            }
            None => record.level.as_str().to_string(),
        };

        let symbol = if self.symbols {
            record.level.symbol().map(|s| format!("{s} ")).unwrap_or_default()
        } else {
            String::new()
        };
        let module = record.module.as_deref().unwrap_or_default();
        let file = record.file.as_deref().unwrap_or_default();
        let line = record.line.unwrap_or_default();
        let message = &record.message;

        let mut out = format!("{symbol}{time} {level:>5} {module}: {file}:{line} {message}");
        for (key, value) in &record.kvs {
            out.push_str(&format!(" {key}={value}"));
        }
        Ok(out.into_bytes())
    }
}

impl From<TextLayout> for Layout {
    fn from(layout: TextLayout) -> Self {
        Layout::Text(layout)
    }
}
