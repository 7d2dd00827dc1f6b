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

use std::io;
use std::path::PathBuf;

use log::SetLoggerError;

/// An error produced while writing or rolling over a log file.
///
/// Write errors are terminal for the single record that triggered them; they
/// never abort the dispatch queue or the logger.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("unable to create log file {path}: {source}")]
    UnableToCreateFile { path: PathBuf, source: io::Error },
    #[error("unable to open log file {path}: {source}")]
    UnableToOpenFile { path: PathBuf, source: io::Error },
    #[error("unable to convert log message to bytes: {0}")]
    UnableToConvertToBytes(String),
    #[error("no available storage at {path} for {requested} bytes")]
    NoAvailableStorage { path: PathBuf, requested: u64 },
    #[error("failed to perform IO action: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to perform IO action: {0}")]
    Io(#[from] io::Error),
    #[error("failed to set up logger: {0}")]
    SetLogger(SetLoggerError),
}

impl From<SetLoggerError> for SetupError {
    fn from(value: SetLoggerError) -> Self {
        SetupError::SetLogger(value)
    }
}
