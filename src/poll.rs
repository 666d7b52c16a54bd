//! Background polling for the "currently running task" indicator.
//!
//! The poller publishes through a `watch` channel. Once stopped it publishes
//! nothing more, including the result of a poll that was in flight.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use momentum_core::models::Task;
use momentum_core::projection::{active_task, tasks_for_goal, tasks_for_routine};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::{ApiClient, ApiResult};

pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[async_trait]
pub trait RunningTaskSource: Send + Sync + 'static {
    async fn running_task(&self) -> ApiResult<Option<Task>>;
}

/// Picks the running task out of a fixed schedule using the local clock.
pub struct ScheduleSource {
    tasks: Vec<Task>,
}

impl ScheduleSource {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl RunningTaskSource for ScheduleSource {
    async fn running_task(&self) -> ApiResult<Option<Task>> {
        Ok(active_task(&self.tasks, Local::now().naive_local()).cloned())
    }
}

/// What to reload on every poll.
#[derive(Debug, Clone, Copy)]
pub enum Watched {
    Goal(u64),
    Routine(u64),
}

/// Reloads the watched tree from the backend on every poll.
pub struct RemoteScheduleSource {
    client: ApiClient,
    watched: Watched,
}

impl RemoteScheduleSource {
    pub fn new(client: ApiClient, watched: Watched) -> Self {
        Self { client, watched }
    }
}

#[async_trait]
impl RunningTaskSource for RemoteScheduleSource {
    async fn running_task(&self) -> ApiResult<Option<Task>> {
        let tasks = match self.watched {
            Watched::Goal(id) => tasks_for_goal(&self.client.get_goal(id).await?),
            Watched::Routine(id) => tasks_for_routine(&self.client.get_routine(id).await?),
        };
        Ok(active_task(&tasks, Local::now().naive_local()).cloned())
    }
}

pub struct RunningTaskPoller {
    updates: watch::Receiver<Option<Task>>,
    stop: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl RunningTaskPoller {
    /// A zero period is raised to [`MIN_POLL_INTERVAL`].
    pub fn spawn<S: RunningTaskSource>(source: S, every: Duration) -> Self {
        let every = every.max(MIN_POLL_INTERVAL);
        let (update_tx, updates) = watch::channel(None);
        let (stop, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(poll_loop(source, every, update_tx, stop_rx));
        Self {
            updates,
            stop,
            handle: Some(handle),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Task>> {
        self.updates.clone()
    }

    pub fn current(&self) -> Option<Task> {
        self.updates.borrow().clone()
    }

    /// Stop polling and wait for the loop to exit.
    pub async fn stop(mut self) {
        let _ = self.stop.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "running task poller exited abnormally");
            }
        }
    }
}

impl Drop for RunningTaskPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn poll_loop<S: RunningTaskSource>(
    source: S,
    every: Duration,
    updates: watch::Sender<Option<Task>>,
    mut stop: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            _ = interval.tick() => {}
        }

        let outcome = tokio::select! {
            _ = stop.changed() => break,
            outcome = source.running_task() => outcome,
        };
        if *stop.borrow() {
            break;
        }

        match outcome {
            Ok(task) => {
                updates.send_if_modified(|current| {
                    if *current == task {
                        return false;
                    }
                    tracing::info!(task = ?task.as_ref().map(|t| t.id), "running task changed");
                    *current = task;
                    true
                });
            }
            Err(e) => tracing::warn!(error = %e, "running task poll failed"),
        }
    }

    tracing::debug!("running task poller stopped");
}
