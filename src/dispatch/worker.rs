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

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::bounded;
use crossbeam_channel::unbounded;
use crossbeam_channel::Receiver;
use crossbeam_channel::RecvError;
use crossbeam_channel::SendTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::TryRecvError;

use super::Message;

/// The consumer of a dispatch queue. A sink performs the whole unit of work
/// for one record (rollover check plus append) and reports its own errors;
/// a failed write never stops the queue.
pub(crate) trait Sink: Send + Sync + 'static {
    fn consume(&self, bytes: &[u8]);
}

pub(crate) type SinkRef = Arc<dyn Sink>;

/// A handle to a running dispatch worker.
///
/// Dropping the owning logger calls [`QueueHandle::drain`], which queues a
/// shutdown marker behind every pending write and then waits, bounded, for
/// the worker to finish. This way no record that passed the level filter is
/// silently dropped on teardown.
#[derive(Debug)]
pub(crate) struct QueueHandle {
    sender: Sender<Message>,
    shutdown: Sender<()>,
    _worker: Option<JoinHandle<()>>,
}

impl QueueHandle {
    pub(crate) fn send(&self, bytes: Vec<u8>) {
        // The only send failure is a disconnected worker during teardown.
        let _ = self.sender.send(Message::Write(bytes));
    }

    pub(crate) fn drain(&self, timeout: Duration) {
        match self.sender.send_timeout(Message::Shutdown, timeout) {
            Ok(()) => {
                // The worker only accepts this rendezvous once it has drained
                // every message ahead of the shutdown marker. The timeout
                // bounds the wait so teardown cannot hang forever.
                let _ = self.shutdown.send_timeout((), timeout);
            }
            Err(SendTimeoutError::Disconnected(_)) => (),
            Err(SendTimeoutError::Timeout(_)) => {
                eprintln!("timed out sending shutdown signal to logging worker");
            }
        }
    }
}

/// Spawns the single worker thread for one logger instance.
pub(crate) fn spawn(
    sink: SinkRef,
    thread_name: impl Into<String>,
    buffered_lines_limit: Option<usize>,
) -> QueueHandle {
    let (sender, receiver) = match buffered_lines_limit {
        Some(cap) => bounded(cap),
        None => unbounded(),
    };
    let (shutdown_sender, shutdown_receiver) = bounded(0);

    let worker = Worker {
        sink,
        receiver,
        shutdown: shutdown_receiver,
    };

    QueueHandle {
        sender,
        shutdown: shutdown_sender,
        _worker: Some(worker.make_thread(thread_name.into())),
    }
}

struct Worker {
    sink: SinkRef,
    receiver: Receiver<Message>,
    shutdown: Receiver<()>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum WorkerState {
    Empty,
    Disconnected,
    Continue,
    Shutdown,
}

impl Worker {
    fn recv(&mut self) -> WorkerState {
        match self.receiver.recv() {
            Ok(Message::Write(bytes)) => {
                self.sink.consume(&bytes);
                WorkerState::Continue
            }
            Ok(Message::Shutdown) => WorkerState::Shutdown,
            Err(RecvError) => WorkerState::Disconnected,
        }
    }

    fn try_recv(&mut self) -> WorkerState {
        match self.receiver.try_recv() {
            Ok(Message::Write(bytes)) => {
                self.sink.consume(&bytes);
                WorkerState::Continue
            }
            Ok(Message::Shutdown) => WorkerState::Shutdown,
            Err(TryRecvError::Empty) => WorkerState::Empty,
            Err(TryRecvError::Disconnected) => WorkerState::Disconnected,
        }
    }

    fn work(&mut self) -> WorkerState {
        let mut state = self.recv();
        while state == WorkerState::Continue {
            state = self.try_recv();
        }
        state
    }

    fn make_thread(mut self, name: String) -> JoinHandle<()> {
        std::thread::Builder::new()
            .name(name)
            .spawn(move || loop {
                match self.work() {
                    WorkerState::Continue | WorkerState::Empty => {}
                    WorkerState::Shutdown | WorkerState::Disconnected => {
                        let _ = self.shutdown.recv();
                        break;
                    }
                }
            })
            .expect("failed to spawn the logging dispatch thread")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Collector {
        lines: Mutex<Vec<String>>,
    }

    impl Sink for Collector {
        fn consume(&self, bytes: &[u8]) {
            let mut lines = self.lines.lock().unwrap();
            lines.push(String::from_utf8_lossy(bytes).into_owned());
        }
    }

    #[test]
    fn test_fifo_order_and_drain() {
        let collector = Arc::new(Collector::default());
        let handle = spawn(collector.clone(), "test-dispatch", None);

        for n in 0..100 {
            handle.send(format!("line {n}").into_bytes());
        }
        handle.drain(Duration::from_secs(5));

        let lines = collector.lines.lock().unwrap();
        assert_eq!(lines.len(), 100);
        for (n, line) in lines.iter().enumerate() {
            assert_eq!(line, &format!("line {n}"));
        }
    }

    #[test]
    fn test_drain_on_empty_queue() {
        let collector = Arc::new(Collector::default());
        let handle = spawn(collector.clone(), "test-dispatch-empty", None);
        handle.drain(Duration::from_secs(1));
        assert!(collector.lines.lock().unwrap().is_empty());
    }
}
