//! Spinner task with scoped lifetime
//!
//! `Spinner::start` spawns the animation; `stop` ends it and waits for the
//! task to finish. If the owner is dropped instead (early return, `?`,
//! cancellation), `Drop` aborts the task and clears the line.

use super::{SharedSink, SPINNER_FRAMES};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Frame period
pub const SPINNER_TICK: Duration = Duration::from_millis(100);

pub struct Spinner {
    sink: SharedSink,
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(sink: SharedSink, text: impl Into<String>) -> Self {
        let text = text.into();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task_sink = sink.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SPINNER_TICK);
            let mut frame = 0usize;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        task_sink.render(&format!("{} {}", SPINNER_FRAMES[frame], text));
                        frame = (frame + 1) % SPINNER_FRAMES.len();
                    }
                }
            }
        });

        Self {
            sink,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stop the animation and wait for the task to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        self.sink.clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            self.sink.clear();
        }
    }
}
