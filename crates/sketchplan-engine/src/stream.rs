//! Sketch vertex streams
//!
//! A stream delivers the typed pointer events of exactly one sketch. It keeps
//! producing events until it has yielded `Finish` or `Cancel`, and is
//! exhausted from then on. Streams are not restartable: every new session
//! binds a fresh stream from a [`StreamSource`].

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use glam::Vec2;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A pointer position reported by the input device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SketchPoint {
    /// Position in scene map coordinates
    pub position: Vec2,
    /// Elevation, if the device reports one
    #[serde(default)]
    pub z: Option<f32>,
}

impl SketchPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            z: None,
        }
    }
}

impl From<Vec2> for SketchPoint {
    fn from(position: Vec2) -> Self {
        Self { position, z: None }
    }
}

/// Typed pointer event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SketchEvent {
    /// Pointer moved without committing a vertex
    CursorUpdate(SketchPoint),
    /// Commit a vertex at the point
    VertexAdd(SketchPoint),
    /// Remove the most recently committed vertex
    VertexRemove,
    /// Seal the draft as-is (terminal)
    Finish,
    /// Discard the draft (terminal)
    Cancel,
}

impl SketchEvent {
    /// Cursor update at (x, y)
    pub fn cursor(x: f32, y: f32) -> Self {
        SketchEvent::CursorUpdate(SketchPoint::new(x, y))
    }

    /// Vertex commit at (x, y)
    pub fn vertex_add(x: f32, y: f32) -> Self {
        SketchEvent::VertexAdd(SketchPoint::new(x, y))
    }

    /// Whether this event ends a sketch
    pub fn is_terminal(&self) -> bool {
        matches!(self, SketchEvent::Finish | SketchEvent::Cancel)
    }

    /// Get the event name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            SketchEvent::CursorUpdate(_) => "cursor-update",
            SketchEvent::VertexAdd(_) => "vertex-add",
            SketchEvent::VertexRemove => "vertex-remove",
            SketchEvent::Finish => "finish",
            SketchEvent::Cancel => "cancel",
        }
    }
}

/// Event sequence bound to a single sketch
pub trait SketchVertexStream {
    /// Get the next pending event.
    ///
    /// Returns `None` when no event is pending right now or when the stream
    /// is exhausted; the caller regains control either way.
    fn next_event(&mut self) -> Option<SketchEvent>;

    /// Whether a terminal event has been yielded
    fn is_terminated(&self) -> bool;
}

/// Binds a fresh stream for each new sketch session
pub trait StreamSource {
    type Stream: SketchVertexStream;

    fn bind(&mut self) -> Self::Stream;
}

/// Stream over pre-recorded events
#[derive(Debug, Clone, Default)]
pub struct ScriptedStream {
    events: VecDeque<SketchEvent>,
    terminated: bool,
}

impl ScriptedStream {
    pub fn new(events: impl IntoIterator<Item = SketchEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            terminated: false,
        }
    }

    /// Events not yet yielded
    pub fn remaining(&self) -> usize {
        if self.terminated { 0 } else { self.events.len() }
    }
}

impl SketchVertexStream for ScriptedStream {
    fn next_event(&mut self) -> Option<SketchEvent> {
        if self.terminated {
            return None;
        }
        let event = self.events.pop_front()?;
        if event.is_terminal() {
            self.terminated = true;
            self.events.clear();
        }
        Some(event)
    }

    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// Hands out one recorded script per bound session
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    scripts: VecDeque<Vec<SketchEvent>>,
    bound: usize,
}

impl ScriptedSource {
    pub fn new(scripts: Vec<Vec<SketchEvent>>) -> Self {
        Self {
            scripts: scripts.into(),
            bound: 0,
        }
    }

    /// Number of streams bound so far
    pub fn bound(&self) -> usize {
        self.bound
    }
}

impl StreamSource for ScriptedSource {
    type Stream = ScriptedStream;

    fn bind(&mut self) -> ScriptedStream {
        self.bound += 1;
        ScriptedStream::new(self.scripts.pop_front().unwrap_or_default())
    }
}

/// Live pointer events routed to the currently bound stream
///
/// The input adapter emits into the hub; the operation binds a new
/// [`PointerStream`] for each session. Events emitted while no stream is
/// bound are dropped.
#[derive(Debug, Clone, Default)]
pub struct PointerHub {
    current: Arc<Mutex<Option<UnboundedSender<SketchEvent>>>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to the bound stream.
    ///
    /// Returns false if no stream is bound. A terminal event unbinds the
    /// stream after delivery.
    pub fn emit(&self, event: SketchEvent) -> bool {
        let mut current = self.current.lock();
        let Some(sender) = current.as_ref() else {
            tracing::trace!("Dropping {} with no bound sketch stream", event.name());
            return false;
        };

        let delivered = sender.unbounded_send(event).is_ok();
        if !delivered || event.is_terminal() {
            *current = None;
        }
        delivered
    }

    /// Whether a stream is currently bound
    pub fn is_bound(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Drop the bound stream's sender, exhausting it
    pub fn unbind(&self) {
        *self.current.lock() = None;
    }
}

impl StreamSource for PointerHub {
    type Stream = PointerStream;

    fn bind(&mut self) -> PointerStream {
        let (sender, receiver) = mpsc::unbounded();
        *self.current.lock() = Some(sender);
        PointerStream {
            receiver,
            terminated: false,
        }
    }
}

/// Receiving end of a [`PointerHub`] binding
#[derive(Debug)]
pub struct PointerStream {
    receiver: UnboundedReceiver<SketchEvent>,
    terminated: bool,
}

impl PointerStream {
    fn observe(&mut self, event: SketchEvent) -> SketchEvent {
        if event.is_terminal() {
            self.terminated = true;
            self.receiver.close();
        }
        event
    }
}

impl SketchVertexStream for PointerStream {
    fn next_event(&mut self) -> Option<SketchEvent> {
        if self.terminated {
            return None;
        }
        match self.receiver.try_next() {
            Ok(Some(event)) => Some(self.observe(event)),
            // Closed, or nothing pending yet
            Ok(None) | Err(_) => None,
        }
    }

    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl Stream for PointerStream {
    type Item = SketchEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<SketchEvent>> {
        let this = self.get_mut();
        if this.terminated {
            return Poll::Ready(None);
        }
        match Pin::new(&mut this.receiver).poll_next(cx) {
            Poll::Ready(Some(event)) => Poll::Ready(Some(this.observe(event))),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_scripted_stream_fuses_after_terminal() {
        let mut stream = ScriptedStream::new(vec![
            SketchEvent::vertex_add(0.0, 0.0),
            SketchEvent::Cancel,
            SketchEvent::vertex_add(1.0, 1.0),
        ]);

        assert_eq!(stream.next_event(), Some(SketchEvent::vertex_add(0.0, 0.0)));
        assert!(!stream.is_terminated());
        assert_eq!(stream.next_event(), Some(SketchEvent::Cancel));
        assert!(stream.is_terminated());
        assert_eq!(stream.next_event(), None);
        assert_eq!(stream.remaining(), 0);
    }

    #[test]
    fn test_scripted_source_binds_in_order() {
        let mut source = ScriptedSource::new(vec![
            vec![SketchEvent::Finish],
            vec![SketchEvent::Cancel],
        ]);

        assert_eq!(source.bind().next_event(), Some(SketchEvent::Finish));
        assert_eq!(source.bind().next_event(), Some(SketchEvent::Cancel));
        assert_eq!(source.bind().next_event(), None);
        assert_eq!(source.bound(), 3);
    }

    #[test]
    fn test_pointer_hub_routes_to_bound_stream() {
        let mut hub = PointerHub::new();
        assert!(!hub.emit(SketchEvent::cursor(1.0, 1.0)));

        let mut stream = hub.bind();
        assert!(hub.is_bound());
        assert_eq!(stream.next_event(), None);

        assert!(hub.emit(SketchEvent::cursor(1.0, 1.0)));
        assert!(hub.emit(SketchEvent::Finish));
        assert!(!hub.is_bound());
        assert!(!hub.emit(SketchEvent::vertex_add(2.0, 2.0)));

        assert_eq!(stream.next_event(), Some(SketchEvent::cursor(1.0, 1.0)));
        assert_eq!(stream.next_event(), Some(SketchEvent::Finish));
        assert!(stream.is_terminated());
        assert_eq!(stream.next_event(), None);
    }

    #[test]
    fn test_rebinding_exhausts_previous_stream() {
        let mut hub = PointerHub::new();
        let mut first = hub.bind();
        let mut second = hub.bind();

        assert!(hub.emit(SketchEvent::VertexRemove));
        assert_eq!(first.next_event(), None);
        assert_eq!(second.next_event(), Some(SketchEvent::VertexRemove));
    }

    #[test]
    fn test_pointer_stream_as_async_stream() {
        let mut hub = PointerHub::new();
        let stream = hub.bind();
        hub.emit(SketchEvent::vertex_add(0.0, 0.0));
        hub.emit(SketchEvent::Cancel);

        let events: Vec<SketchEvent> = futures::executor::block_on(stream.collect());
        assert_eq!(
            events,
            vec![SketchEvent::vertex_add(0.0, 0.0), SketchEvent::Cancel]
        );
    }
}
