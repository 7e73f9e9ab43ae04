//! Threaded session driver
//!
//! Owns a [`Session`] on its own thread. Commands from any thread arrive on a
//! channel and are applied between ticks, one at a time. The latest snapshot
//! is published behind a mutex for readers.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::session::{Command, Session};
use crate::snapshot::GameSnapshot;

/// Wake-up interval while the clock is stopped
const IDLE_POLL: Duration = Duration::from_millis(50);

enum Message {
    Command(Command),
    Shutdown,
}

pub struct Driver {
    sender: Sender<Message>,
    snapshot: Arc<Mutex<GameSnapshot>>,
    handle: Option<JoinHandle<()>>,
}

impl Driver {
    /// Start the driver thread. The session is built on that thread, so its
    /// collaborators need not be `Send`.
    pub fn spawn<F>(make_session: F) -> Self
    where
        F: FnOnce() -> Session + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Message>();
        let snapshot = Arc::new(Mutex::new(GameSnapshot::default()));
        let published = Arc::clone(&snapshot);

        let handle = thread::spawn(move || {
            let mut session = make_session();
            publish(&published, &session);
            let mut last = Instant::now();

            loop {
                let timeout = if session.clock().is_running() {
                    session.clock().until_next()
                } else {
                    IDLE_POLL
                };
                let message = receiver.recv_timeout(timeout);

                // Ticks owed before the command is applied
                let now = Instant::now();
                session.update(now - last);
                last = now;

                match message {
                    Ok(Message::Command(command)) => session.apply(command),
                    Ok(Message::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                        publish(&published, &session);
                        break;
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                }
                publish(&published, &session);
            }
            log::info!("Driver stopped");
        });

        Self {
            sender,
            snapshot,
            handle: Some(handle),
        }
    }

    /// Queue a command. Returns false once the driver has stopped.
    pub fn send(&self, command: Command) -> bool {
        self.sender.send(Message::Command(command)).is_ok()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stop the thread after all queued commands; returns the final snapshot
    pub fn shutdown(mut self) -> GameSnapshot {
        self.stop();
        self.snapshot()
    }

    fn stop(&mut self) {
        let _ = self.sender.send(Message::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Driver thread panicked");
            }
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn publish(target: &Mutex<GameSnapshot>, session: &Session) {
    *target.lock().unwrap_or_else(PoisonError::into_inner) = session.snapshot();
}
