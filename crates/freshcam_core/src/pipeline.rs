//! Request lifecycle for one result screen.
//!
//! The blocking HTTP call runs on a worker thread. Its outcome comes back over
//! a channel tagged with the attempt number and is applied on the owning
//! thread in [`ClassificationPipeline::poll`]. Outcomes from an attempt that
//! is no longer current are dropped, so leaving the screen mid-request never
//! touches state that has moved on.

use crate::capture::ImageHandle;
use crate::client::{ClassificationRequest, Classifier};
use crate::error::{ClassifyError, PipelineError};
use crate::result::{Classification, ClassificationResult, parse_payload};
use crate::view::ResultView;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

/// Where the current result screen is in its request lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Idle,
    Loading,
    Succeeded(Classification),
    Failed(String),
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Loading => "loading",
            PipelineState::Succeeded(_) => "succeeded",
            PipelineState::Failed(_) => "failed",
        }
    }
}

type Notifier = Arc<dyn Fn() + Send + Sync>;

struct AttemptOutcome {
    attempt: u64,
    result: Result<ClassificationResult, ClassifyError>,
}

/// Owns one image and drives it through classification, retry and teardown.
pub struct ClassificationPipeline {
    classifier: Arc<dyn Classifier>,
    state: PipelineState,
    image: Option<ImageHandle>,
    attempt: u64,
    tx: Sender<AttemptOutcome>,
    rx: Receiver<AttemptOutcome>,
    notifier: Option<Notifier>,
}

impl ClassificationPipeline {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            classifier,
            state: PipelineState::Idle,
            image: None,
            attempt: 0,
            tx,
            rx,
            notifier: None,
        }
    }

    /// Called from the worker thread after an outcome is queued.
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notifier = Some(Arc::new(notify));
        self
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub fn view(&self) -> ResultView {
        ResultView::from_state(&self.state)
    }

    /// Idle → Loading for a freshly received image.
    pub fn submit(&mut self, image: ImageHandle) -> Result<(), PipelineError> {
        match self.state {
            PipelineState::Idle => {}
            PipelineState::Loading => return Err(PipelineError::Busy),
            ref other => return Err(PipelineError::NotIdle(other.name())),
        }
        self.image = Some(image);
        self.dispatch()
    }

    /// Failed → Loading with the same image and a new request.
    pub fn retry(&mut self) -> Result<(), PipelineError> {
        match self.state {
            PipelineState::Failed(_) if self.image.is_some() => self.dispatch(),
            PipelineState::Loading => Err(PipelineError::Busy),
            _ => Err(PipelineError::NothingToRetry),
        }
    }

    /// Back to Idle, dropping the image, any result, and any in-flight
    /// attempt's eventual outcome.
    pub fn leave(&mut self) {
        if self.state == PipelineState::Loading {
            tracing::debug!("abandoning attempt {}", self.attempt);
        }
        self.attempt += 1;
        self.image = None;
        self.transition(PipelineState::Idle);
    }

    /// Apply any finished attempt. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(outcome) => changed |= self.apply(outcome),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    /// Block until the current attempt resolves or `timeout` passes.
    /// Returns true when a terminal state was reached.
    pub fn wait_for_outcome(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state == PipelineState::Loading {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok(outcome) => {
                    self.apply(outcome);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.state != PipelineState::Loading
    }

    fn dispatch(&mut self) -> Result<(), PipelineError> {
        let Some(image) = self.image.as_ref() else {
            return Err(PipelineError::NothingToRetry);
        };
        let attempt = self.attempt + 1;
        let request = ClassificationRequest::new(image, attempt);
        let classifier = Arc::clone(&self.classifier);
        let tx = self.tx.clone();
        let notifier = self.notifier.clone();

        thread::Builder::new()
            .name(format!("classify-{attempt}"))
            .spawn(move || {
                let result =
                    panic::catch_unwind(AssertUnwindSafe(|| classifier.classify(&request)))
                        .unwrap_or_else(|_| {
                            Err(ClassifyError::Transport(format!(
                                "classifier panicked on attempt {attempt}"
                            )))
                        })
                        .and_then(|payload| parse_payload(&payload));
                if tx.send(AttemptOutcome { attempt, result }).is_ok()
                    && let Some(notify) = notifier
                {
                    notify();
                }
            })
            .map_err(|e| PipelineError::Spawn(e.to_string()))?;

        self.attempt = attempt;
        self.transition(PipelineState::Loading);
        Ok(())
    }

    fn apply(&mut self, outcome: AttemptOutcome) -> bool {
        if outcome.attempt != self.attempt || self.state != PipelineState::Loading {
            tracing::debug!(
                "discarding stale outcome of attempt {} (current {}, {})",
                outcome.attempt,
                self.attempt,
                self.state.name()
            );
            return false;
        }
        let next = match outcome.result {
            Ok(ClassificationResult::Success(classification)) => {
                tracing::info!(
                    "classified {} as {} ({}%)",
                    classification.fruit_name,
                    classification.ripeness,
                    classification.confidence_percent
                );
                PipelineState::Succeeded(classification)
            }
            Ok(ClassificationResult::Failure { message }) => {
                tracing::warn!("classification service reported: {message}");
                PipelineState::Failed(message)
            }
            Err(err) => {
                tracing::warn!("classification attempt {} failed: {err}", outcome.attempt);
                PipelineState::Failed(err.reason())
            }
        };
        self.transition(next);
        true
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!("pipeline {} -> {}", self.state.name(), next.name());
        self.state = next;
    }
}
