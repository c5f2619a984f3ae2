//! Deferred guard reset for the preferences store.
//!
//! One thread per store sleeps until the earliest scheduled deadline, runs the
//! callback, then waits again. Dropping [`ResetTimer`] stops the thread and
//! discards any deadline that has not fired yet.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

enum Command {
    Schedule(Instant),
    Shutdown,
}

/// Sending half, held by whoever needs to schedule resets.
#[derive(Clone)]
pub(crate) struct Scheduler {
    commands: Sender<Command>,
}

/// Receiving half, waiting to be handed to [`ResetTimer::spawn`].
pub(crate) struct TimerQueue {
    commands: Receiver<Command>,
}

pub(crate) fn channel() -> (Scheduler, TimerQueue) {
    let (tx, rx) = mpsc::channel();
    (Scheduler { commands: tx }, TimerQueue { commands: rx })
}

impl Scheduler {
    /// Fires the callback once `delay` has elapsed.
    ///
    /// A deadline already pending is pushed back rather than duplicated.
    pub(crate) fn schedule_after(&self, delay: Duration) {
        // Fails only once the timer thread is gone, when there is nothing left to reset.
        let _ = self.commands.send(Command::Schedule(Instant::now() + delay));
    }
}

/// Owns the timer thread.
pub(crate) struct ResetTimer {
    commands: Sender<Command>,
    thread: Option<JoinHandle<()>>,
}

impl ResetTimer {
    pub(crate) fn spawn<F>(
        scheduler: &Scheduler,
        queue: TimerQueue,
        on_fire: F,
    ) -> std::io::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let thread = thread::Builder::new()
            .name("fenn-preferences".to_string())
            .spawn(move || run(queue.commands, on_fire))?;
        Ok(Self {
            commands: scheduler.commands.clone(),
            thread: Some(thread),
        })
    }
}

impl Drop for ResetTimer {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        let Some(thread) = self.thread.take() else {
            return;
        };
        // A callback that drops the store would otherwise wait on itself.
        if thread.thread().id() == thread::current().id() {
            return;
        }
        if thread.join().is_err() {
            tracing::error!("Preferences timer thread panicked");
        }
    }
}

fn run(commands: Receiver<Command>, on_fire: impl Fn()) {
    let mut deadline: Option<Instant> = None;
    loop {
        let command = match deadline {
            Some(at) => {
                let now = Instant::now();
                if at <= now {
                    deadline = None;
                    on_fire();
                    continue;
                }
                commands.recv_timeout(at - now)
            }
            None => commands.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match command {
            Ok(Command::Schedule(at)) => {
                deadline = Some(deadline.map_or(at, |pending| pending.max(at)));
            }
            Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
}
