//! Background poll task for the attached call.

use crate::events::TuiEvent;
use callscope_core::CallBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Owns the running poll task. Dropping the handle cancels it.
#[derive(Debug)]
pub struct PollHandle {
    call_id: String,
    generation: u64,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once the task stopped on its own or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start polling `call_id`.
///
/// The first fetch is issued immediately, then one per `interval`.
/// Fetches never overlap. The task ends after delivering a terminal
/// record, or when the event channel closes.
pub fn spawn_poller(
    backend: Arc<dyn CallBackend>,
    call_id: String,
    generation: u64,
    interval: Duration,
    sender: mpsc::Sender<TuiEvent>,
) -> PollHandle {
    let task_call_id = call_id.clone();
    let task = tokio::spawn(async move {
        let call_id = task_call_id;
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(call_id = %call_id, generation, "Polling started");

        loop {
            ticker.tick().await;
            let result = backend.get_call(&call_id).await;
            let terminal = match &result {
                Ok(snapshot) => {
                    tracing::debug!(
                        call_id = %call_id,
                        generation,
                        status = %snapshot.record.call_status,
                        has_analysis = snapshot.record.has_analysis(),
                        "Fetched call"
                    );
                    snapshot.is_terminal()
                }
                Err(err) => {
                    tracing::warn!(call_id = %call_id, generation, error = %err, "Call fetch failed");
                    false
                }
            };
            let event = TuiEvent::CallFetched {
                generation,
                call_id: call_id.clone(),
                result,
            };
            if sender.send(event).await.is_err() {
                tracing::debug!(call_id = %call_id, generation, "Event channel closed");
                break;
            }
            if terminal {
                tracing::info!(call_id = %call_id, generation, "Polling stopped: call complete");
                break;
            }
        }
    });

    PollHandle {
        call_id,
        generation,
        task,
    }
}
