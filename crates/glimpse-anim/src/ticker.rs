//! Cancellable periodic tick source.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, Sender};
use tracing::trace;

/// One timer firing, stamped with the generation of the ticker that sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// A background thread that sends a [`Tick`] every `interval`.
///
/// Dropping or cancelling the ticker stops the thread and waits for it to
/// exit, so no tick is sent after cancellation returns.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    generation: u64,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Start sending ticks to `sink`.
    ///
    /// The thread also exits on its own once `sink` is disconnected.
    pub fn spawn(interval: Duration, generation: u64, sink: Sender<Tick>) -> Self {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let ticks = crossbeam_channel::tick(interval);

        let handle = thread::Builder::new()
            .name(format!("glimpse-ticker-{generation}"))
            .spawn(move || loop {
                select! {
                    recv(ticks) -> _ => {
                        trace!(generation, "tick");
                        if sink.send(Tick { generation }).is_err() {
                            break;
                        }
                    }
                    recv(stop_rx) -> _ => break,
                }
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "failed to start ticker thread");
                None
            }
        };

        Self {
            interval,
            generation,
            stop: Some(stop_tx),
            handle,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the thread and wait for it to exit.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Disconnecting the stop channel wakes the select.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Interval between ticks for `fps` frames per second.
pub(crate) fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.max(1)))
}
