//! Sketch operations
//!
//! An operation is one user action ("create street") that may capture several
//! sketches. Sessions run one at a time: when a session finishes or is
//! canceled, the operation binds a fresh stream and starts the next one.
//! Finished geometries are collected in session-start order and handed out
//! through a single [`OperationCompletion`] future once the caller signals
//! done, cancels, or drops the operation.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sketchplan_core::{ConstraintRegion, Geometry, GeometryKind};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::feedback::FeedbackSink;
use crate::{
    FeedOutcome, SessionId, SessionOutcome, SketchError, SketchSession, SketchVertexStream,
    StreamSource, TerminalResult,
};

/// Unique identifier of a sketch operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(Uuid);

impl OperationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an operation starts sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPolicy {
    /// Start the next session when the previous one ends
    pub chain: bool,
    /// Upper bound on sessions started, if any
    pub max_sessions: Option<usize>,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            chain: true,
            max_sessions: None,
        }
    }
}

impl SessionPolicy {
    /// A single sketch per operation
    pub fn single() -> Self {
        Self {
            chain: false,
            max_sessions: Some(1),
        }
    }

    fn allows_next(&self, started: usize) -> bool {
        self.chain && self.max_sessions.is_none_or(|max| started < max)
    }
}

/// Why an operation resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationEnding {
    /// The caller signaled done
    Done,
    /// The operation was canceled
    Canceled,
    /// The operation was dropped while still open
    TornDown,
}

/// Per-session record in an operation result
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub session: SessionId,
    pub outcome: SessionOutcome,
}

/// Resolved value of an operation
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    pub operation: OperationId,
    pub kind: GeometryKind,
    /// Finished geometries in session-start order
    pub geometries: Vec<Geometry>,
    pub sessions: Vec<SessionSummary>,
    pub ending: OperationEnding,
}

pub type CompletionResult = Result<OperationResult, SketchError>;

/// Future resolving once with the operation's result
#[derive(Debug)]
pub struct OperationCompletion {
    receiver: oneshot::Receiver<CompletionResult>,
}

impl Future for OperationCompletion {
    type Output = CompletionResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<CompletionResult> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(SketchError::OperationDropped)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlRequest {
    None,
    Done,
    Cancel,
}

/// Requests from a handle, applied the next time the operation is driven
#[derive(Debug, Clone)]
pub struct OperationControl {
    request: Arc<Mutex<ControlRequest>>,
}

impl OperationControl {
    fn new() -> Self {
        Self {
            request: Arc::new(Mutex::new(ControlRequest::None)),
        }
    }

    pub fn done(&self) {
        let mut request = self.request.lock();
        if *request == ControlRequest::None {
            *request = ControlRequest::Done;
        }
    }

    pub fn cancel(&self) {
        *self.request.lock() = ControlRequest::Cancel;
    }

    fn take(&self) -> ControlRequest {
        std::mem::replace(&mut *self.request.lock(), ControlRequest::None)
    }
}

/// Caller-side handle of an operation
#[derive(Debug)]
pub struct OperationHandle {
    pub id: OperationId,
    pub completion: OperationCompletion,
    control: OperationControl,
}

impl OperationHandle {
    /// Request cancellation
    pub fn cancel(&self) {
        self.control.cancel();
    }

    /// Request resolution with the geometries finished so far
    pub fn done(&self) {
        self.control.done();
    }

    pub fn control(&self) -> OperationControl {
        self.control.clone()
    }
}

/// Counters for one [`SketchOperation::pump`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub events: usize,
    pub finished: usize,
    pub canceled: usize,
    pub rejected: usize,
}

struct ActiveSketch<T> {
    session: SketchSession,
    stream: T,
}

/// Orchestrates the sessions of one user action
pub struct SketchOperation<S: StreamSource> {
    id: OperationId,
    kind: GeometryKind,
    region: Arc<ConstraintRegion>,
    policy: SessionPolicy,
    source: S,
    sink: Box<dyn FeedbackSink>,
    current: Option<ActiveSketch<S::Stream>>,
    geometries: Vec<Geometry>,
    sessions: Vec<SessionSummary>,
    started: usize,
    accepting: bool,
    ending: Option<OperationEnding>,
    completion: Option<oneshot::Sender<CompletionResult>>,
    control: OperationControl,
}

/// Start an operation with the default sequential policy
pub fn start_operation<S: StreamSource>(
    kind: GeometryKind,
    region: Arc<ConstraintRegion>,
    source: S,
    sink: Box<dyn FeedbackSink>,
) -> (SketchOperation<S>, OperationHandle) {
    SketchOperation::start(kind, region, source, sink, SessionPolicy::default())
}

impl<S: StreamSource> SketchOperation<S> {
    /// Start an operation and its first session
    pub fn start(
        kind: GeometryKind,
        region: Arc<ConstraintRegion>,
        source: S,
        sink: Box<dyn FeedbackSink>,
        policy: SessionPolicy,
    ) -> (Self, OperationHandle) {
        let (sender, receiver) = oneshot::channel();
        let control = OperationControl::new();
        let id = OperationId::new();

        let mut operation = Self {
            id,
            kind,
            region,
            policy,
            source,
            sink,
            current: None,
            geometries: Vec::new(),
            sessions: Vec::new(),
            started: 0,
            accepting: true,
            ending: None,
            completion: Some(sender),
            control: control.clone(),
        };
        info!("Operation {} started ({})", id, kind.name());
        operation.start_session();

        let handle = OperationHandle {
            id,
            completion: OperationCompletion { receiver },
            control,
        };
        (operation, handle)
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// The session currently bound to a stream, if any
    pub fn active_session(&self) -> Option<&SketchSession> {
        self.current.as_ref().map(|a| &a.session)
    }

    /// Number of sessions started so far
    pub fn sessions_started(&self) -> usize {
        self.started
    }

    /// Geometries finished so far
    pub fn finished(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn is_resolved(&self) -> bool {
        self.ending.is_some()
    }

    pub fn ending(&self) -> Option<OperationEnding> {
        self.ending
    }

    /// Drain every pending event from the bound streams.
    ///
    /// Events already queued are processed before any handle request, so a
    /// sketch finished ahead of `done` is kept. A session that reaches a
    /// terminal state is replaced by the next one once its stream has
    /// nothing more to deliver. An event arriving at a terminal session
    /// aborts the operation; the completion resolves with that error.
    pub fn pump(&mut self) -> Result<PumpReport, SketchError> {
        if self.is_resolved() {
            return Err(SketchError::OperationClosed(self.id));
        }

        let mut report = PumpReport::default();
        loop {
            let Some(active) = self.current.as_mut() else {
                break;
            };

            let Some(event) = active.stream.next_event() else {
                if active.session.state().is_terminal() {
                    self.rotate();
                    continue;
                }
                break;
            };

            report.events += 1;
            match active.session.feed(event, self.sink.as_mut()) {
                Ok(FeedOutcome::Validity(_)) => {}
                Ok(FeedOutcome::Terminal(result)) => {
                    match &result {
                        TerminalResult::Finished(_) => report.finished += 1,
                        TerminalResult::Canceled => report.canceled += 1,
                    }
                    let session = active.session.id();
                    self.record(session, result);
                }
                Err(error) if error.is_soft() => {
                    report.rejected += 1;
                    // The stream ended on the rejected finish; keep sketching on a new one
                    if active.stream.is_terminated() {
                        debug!("Rebinding stream for session {}", active.session.id());
                        active.stream = self.source.bind();
                    }
                }
                Err(error) => {
                    self.abort(error.clone());
                    return Err(error);
                }
            }
        }

        match self.control.take() {
            ControlRequest::Cancel => self.cancel()?,
            ControlRequest::Done => self.done()?,
            ControlRequest::None => {}
        }
        Ok(report)
    }

    /// Resolve with the geometries finished so far.
    ///
    /// An active session is canceled; its draft is discarded.
    pub fn done(&mut self) -> Result<(), SketchError> {
        self.resolve(OperationEnding::Done)
    }

    /// Stop starting sessions, cancel the active one and resolve with the
    /// geometries finished so far
    pub fn cancel(&mut self) -> Result<(), SketchError> {
        self.resolve(OperationEnding::Canceled)
    }

    fn start_session(&mut self) {
        let session = SketchSession::start(self.kind, Arc::clone(&self.region));
        let stream = self.source.bind();
        self.started += 1;
        debug!(
            "Operation {} started session {} ({} of {})",
            self.id,
            session.id(),
            self.started,
            self.policy
                .max_sessions
                .map_or_else(|| "unbounded".to_string(), |m| m.to_string())
        );
        self.sink.on_session_started(session.id(), self.kind);
        self.current = Some(ActiveSketch { session, stream });
    }

    /// Replace a terminated session with the next one, if the policy allows
    fn rotate(&mut self) {
        self.current = None;
        if self.accepting && self.policy.allows_next(self.started) {
            self.start_session();
        } else {
            debug!("Operation {} waiting for done", self.id);
        }
    }

    fn record(&mut self, session: SessionId, result: TerminalResult) {
        let outcome = result.outcome();
        self.sink.on_session_ended(session, &outcome);
        if let TerminalResult::Finished(geometry) = result {
            self.geometries.push(geometry);
        }
        self.sessions.push(SessionSummary { session, outcome });
    }

    fn cancel_in_flight(&mut self) {
        let Some(mut active) = self.current.take() else {
            return;
        };
        if active.session.cancel_in_flight() {
            self.record(active.session.id(), TerminalResult::Canceled);
        }
    }

    fn resolve(&mut self, ending: OperationEnding) -> Result<(), SketchError> {
        if self.is_resolved() {
            return Err(SketchError::OperationClosed(self.id));
        }

        self.accepting = false;
        self.cancel_in_flight();
        self.ending = Some(ending);

        let result = OperationResult {
            operation: self.id,
            kind: self.kind,
            geometries: std::mem::take(&mut self.geometries),
            sessions: self.sessions.clone(),
            ending,
        };
        info!(
            "Operation {} resolved ({:?}) with {} geometries",
            self.id,
            ending,
            result.geometries.len()
        );

        if let Some(sender) = self.completion.take() {
            if sender.send(Ok(result)).is_err() {
                debug!("Operation {} completion was not awaited", self.id);
            }
        }
        Ok(())
    }

    fn abort(&mut self, error: SketchError) {
        warn!("Operation {} aborted: {}", self.id, error);
        self.accepting = false;
        self.cancel_in_flight();
        self.ending = Some(OperationEnding::Canceled);
        if let Some(sender) = self.completion.take() {
            let _ = sender.send(Err(error));
        }
    }
}

impl<S: StreamSource> Drop for SketchOperation<S> {
    fn drop(&mut self) {
        if !self.is_resolved() {
            let _ = self.resolve(OperationEnding::TornDown);
        }
    }
}

impl<S: StreamSource> fmt::Debug for SketchOperation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SketchOperation")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("policy", &self.policy)
            .field("started", &self.started)
            .field("finished", &self.geometries.len())
            .field(
                "active",
                &self.current.as_ref().map(|a| a.session.state()),
            )
            .field("ending", &self.ending)
            .finish()
    }
}
