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

//! Logwheel is a pluggable logging library: leveled loggers writing to the
//! console, to rolling text files, or to rolling JSON-array files, plus a
//! fan-out logger broadcasting to several destinations at once.
//!
//! # Overview
//!
//! Every destination implements the [`Logger`] trait. File loggers roll their
//! live file over per a [`rolling::RolloverPolicy`], archive it under a
//! [`rolling::Naming`] strategy, and serialize all writers of one physical
//! file through a per-file channel, so independent logger instances pointing
//! at the same path never interleave records.
//!
//! # Examples
//!
//! Log to a size-capped rolling file:
//!
//! ```no_run
//! use logwheel::rolling::Naming;
//! use logwheel::rolling::RolloverPolicy;
//! use logwheel::FileLogger;
//! use logwheel::Level;
//! use logwheel::Logger;
//! use logwheel::Record;
//!
//! let logger = FileLogger::builder("logs/app.log")
//!     .threshold(Level::Info)
//!     .rollover(RolloverPolicy::at_size(1024 * 1024, Naming::sequential_with(5)))
//!     .build()
//!     .unwrap();
//!
//! logger.log_message(&Record::new(Level::Info, "service started"));
//! ```
//!
//! Fan out to console and file, driven by the `log` macros:
//!
//! ```no_run
//! use logwheel::ConsoleLogger;
//! use logwheel::FileLogger;
//! use logwheel::GroupLogger;
//! use logwheel::Level;
//!
//! let group = GroupLogger::new()
//!     .with(ConsoleLogger::new(Level::Info))
//!     .with(FileLogger::builder("logs/app.log").build().unwrap());
//! logwheel::bridge::install(group).unwrap();
//!
//! log::info!("goes to both destinations");
//! ```

pub mod bridge;
pub mod layout;
pub mod rolling;

mod dispatch;
mod error;
mod level;
mod logger;
mod record;
mod registry;
mod writer;

pub use error::SetupError;
pub use error::WriteError;
pub use layout::Layout;
pub use level::Level;
pub use level::Threshold;
pub use logger::ConsoleLogger;
pub use logger::ErrorHook;
pub use logger::FileLogger;
pub use logger::FileLoggerBuilder;
pub use logger::GroupLogger;
pub use logger::Logger;
pub use record::Record;
