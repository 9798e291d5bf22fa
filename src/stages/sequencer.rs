//! Timed progress stages.
//!
//! A spawned task sleeps through each stage's duration and publishes the new
//! index on a `watch` channel. The index only moves forward. Cancelling seals
//! the publisher under its lock before aborting the task, so a timer that has
//! already fired can never publish afterwards.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("stage sequencer must be started inside a tokio runtime")]
    NoRuntime,
}

/// One named stage and how long it is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stage {
    pub name: String,
    pub duration_ms: u64,
    /// CSS-style filter applied to the preview while this stage runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Stage {
    pub fn new(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            duration_ms,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// The stages shown while a photo is being enhanced.
pub fn default_stages() -> Vec<Stage> {
    vec![
        Stage::new("Analyzing facial features", 3000).with_filter("brightness(1.05)"),
        Stage::new("Smoothing skin texture", 3500)
            .with_filter("brightness(1.1) contrast(0.95)"),
        Stage::new("Enhancing natural glow", 3000)
            .with_filter("brightness(1.15) saturate(1.1)"),
        Stage::new("Perfecting complexion", 2500)
            .with_filter("brightness(1.2) saturate(1.15) contrast(0.9)"),
        Stage::new("Applying radiance boost", 2000)
            .with_filter("brightness(1.25) saturate(1.2) contrast(0.85) hue-rotate(5deg)"),
        Stage::new("Finalizing your glow up", 4000)
            .with_filter("brightness(1.3) saturate(1.25) contrast(0.8) hue-rotate(10deg)"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Done,
    Running,
    Pending,
}

/// Where the sequence is. Stages before `current` are complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProgress {
    pub current: usize,
    pub total: usize,
}

impl StageProgress {
    pub fn is_finished(&self) -> bool {
        self.current >= self.total
    }

    pub fn completed(&self) -> usize {
        self.current.min(self.total)
    }

    pub fn status(&self, index: usize) -> StageStatus {
        use std::cmp::Ordering::*;
        match index.cmp(&self.current) {
            Less => StageStatus::Done,
            Equal => StageStatus::Running,
            Greater => StageStatus::Pending,
        }
    }
}

type Publisher = Arc<Mutex<Option<watch::Sender<StageProgress>>>>;

fn lock(publisher: &Publisher) -> MutexGuard<'_, Option<watch::Sender<StageProgress>>> {
    publisher.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct StageSequencer {
    stages: Arc<[Stage]>,
    progress: watch::Receiver<StageProgress>,
    publisher: Publisher,
    task: Option<JoinHandle<()>>,
    cancelled: bool,
}

impl StageSequencer {
    /// Start advancing through `stages` on the current tokio runtime.
    pub fn start(stages: Vec<Stage>) -> Result<Self, StageError> {
        let handle = Handle::try_current().map_err(|_| StageError::NoRuntime)?;
        let stages: Arc<[Stage]> = stages.into();
        let total = stages.len();
        let (tx, rx) = watch::channel(StageProgress { current: 0, total });
        let publisher: Publisher = Arc::new(Mutex::new(Some(tx)));

        let task = (total > 0).then(|| {
            handle.spawn(advance(Arc::clone(&stages), Arc::clone(&publisher)))
        });
        log::debug!("stage sequence started with {total} stages");

        Ok(Self {
            stages,
            progress: rx,
            publisher,
            task,
            cancelled: false,
        })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn progress(&self) -> StageProgress {
        *self.progress.borrow()
    }

    pub fn current_index(&self) -> usize {
        self.progress().current
    }

    pub fn is_finished(&self) -> bool {
        self.progress().is_finished()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Name of the running stage; `None` once every stage is done.
    pub fn current_stage_name(&self) -> Option<&str> {
        self.stages
            .get(self.current_index())
            .map(|stage| stage.name.as_str())
    }

    /// Preview filter of the running stage, if it has one.
    pub fn current_filter(&self) -> Option<&str> {
        self.stages
            .get(self.current_index())
            .and_then(|stage| stage.filter.as_deref())
    }

    /// A receiver that sees every index change.
    pub fn subscribe(&self) -> watch::Receiver<StageProgress> {
        self.progress.clone()
    }

    /// Resolve when the sequence finishes or is cancelled, with the final
    /// progress.
    pub async fn wait(&self) -> StageProgress {
        let mut rx = self.progress.clone();
        // Err means the publisher was sealed; the last value is frozen.
        let result = rx.wait_for(StageProgress::is_finished).await.map(|p| *p);
        result.unwrap_or_else(|_| *rx.borrow())
    }

    /// Await `operation` while the stages play. The sequence is not touched
    /// when it completes.
    pub async fn track<F: Future>(&self, operation: F) -> F::Output {
        let output = operation.await;
        let p = self.progress();
        log::debug!("operation finished during stage {}/{}", p.current, p.total);
        output
    }

    /// Stop advancing. No index change is observable afterwards. Idempotent.
    pub fn cancel(&mut self) {
        if lock(&self.publisher).take().is_none() {
            return;
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if !self.is_finished() {
            self.cancelled = true;
            log::debug!("stage sequence cancelled at {}", self.current_index());
        }
    }
}

impl Drop for StageSequencer {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn advance(stages: Arc<[Stage]>, publisher: Publisher) {
    let total = stages.len();
    for (index, stage) in stages.iter().enumerate() {
        tokio::time::sleep(stage.duration()).await;
        let guard = lock(&publisher);
        let Some(tx) = guard.as_ref() else {
            return;
        };
        tx.send_replace(StageProgress {
            current: index + 1,
            total,
        });
        log::debug!("stage complete: {}", stage.name);
    }
}
