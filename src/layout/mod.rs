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

//! Layouts for formatting log records.

pub use json::JsonLayout;
pub use text::TextLayout;

mod json;
mod text;

use crate::error::WriteError;
use crate::writer::Framing;
use crate::Record;

/// Represents a layout for formatting log records.
#[derive(Debug, Clone)]
pub enum Layout {
    Text(TextLayout),
    Json(JsonLayout),
}

impl Layout {
    pub(crate) fn format(&self, record: &Record) -> Result<Vec<u8>, WriteError> {
        match self {
            Layout::Text(layout) => layout.format(record),
            Layout::Json(layout) => layout.format(record),
        }
    }

    /// The file framing matching this layout: text records are plain lines,
    /// JSON records live in a single well-formed array per file.
    pub(crate) fn framing(&self) -> Framing {
        match self {
            Layout::Text(_) => Framing::Line,
            Layout::Json(_) => Framing::JsonArray,
        }
    }
}
