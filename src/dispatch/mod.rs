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

//! Per-logger dispatch: a single-worker FIFO queue that moves file writes off
//! the calling thread, and its drain-on-drop teardown.

mod worker;

pub(crate) use worker::spawn;
pub(crate) use worker::QueueHandle;
pub(crate) use worker::Sink;
pub(crate) use worker::SinkRef;

#[derive(Debug)]
pub(crate) enum Message {
    Write(Vec<u8>),
    Shutdown,
}
