//! Gesture Module - Pan recognizer and content nodes
//!
//! The host's gesture system owns hit-testing and pointer tracking. What the
//! card needs from it is small:
//! - a pan recognizer that reports cumulative displacement
//! - a per-node set of attached recognizers
//! - a node width, to size the swipe threshold
//!
//! Pan updates may be delivered on any thread, so everything in here is
//! `Send + Sync`. Handlers never touch visual state directly; see
//! [`crate::state::dispatch`].
//!
//! # Example
//!
//! ```ignore
//! use spark_card::state::gesture::{PanGestureRecognizer, PanUpdate, View};
//!
//! let view = Arc::new(View::new("row", 320.0));
//! let recognizer = PanGestureRecognizer::new();
//! view.gesture_recognizers().add(recognizer.clone());
//!
//! // From the host's input thread
//! recognizer.send_pan_updated(&PanUpdate::running(42.0, 0.0));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// =============================================================================
// TYPES
// =============================================================================

/// Phase of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanStatus {
    Started,
    Running,
    Completed,
    Canceled,
}

/// A pan event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanUpdate {
    /// Phase of the gesture
    pub status: PanStatus,
    /// Cumulative horizontal displacement since the gesture started
    pub total_x: f64,
    /// Cumulative vertical displacement since the gesture started
    pub total_y: f64,
}

impl PanUpdate {
    pub fn new(status: PanStatus, total_x: f64, total_y: f64) -> Self {
        Self { status, total_x, total_y }
    }

    /// Gesture start (no displacement yet).
    pub fn started() -> Self {
        Self::new(PanStatus::Started, 0.0, 0.0)
    }

    /// Drag update with cumulative displacement.
    pub fn running(total_x: f64, total_y: f64) -> Self {
        Self::new(PanStatus::Running, total_x, total_y)
    }

    pub fn completed() -> Self {
        Self::new(PanStatus::Completed, 0.0, 0.0)
    }

    pub fn canceled() -> Self {
        Self::new(PanStatus::Canceled, 0.0, 0.0)
    }
}

/// Pan update handler. Runs on whatever thread delivers the update.
pub type PanHandler = Arc<dyn Fn(&PanUpdate) + Send + Sync>;

/// Identifies a handler registered with [`PanGestureRecognizer::on_pan_updated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Handlers run outside the lock, so a poisoned lock still holds consistent data
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// PAN GESTURE RECOGNIZER
// =============================================================================

/// Recognizes single-pointer drags and fans updates out to handlers.
///
/// Shared by `Arc`: the recognizer lives in a node's recognizer set and in the
/// swipe controller at the same time.
pub struct PanGestureRecognizer {
    touch_points: AtomicU32,
    handlers: Mutex<Vec<(HandlerId, PanHandler)>>,
    next_handler_id: AtomicUsize,
}

impl PanGestureRecognizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            touch_points: AtomicU32::new(1),
            handlers: Mutex::new(Vec::new()),
            next_handler_id: AtomicUsize::new(0),
        })
    }

    /// Number of simultaneous touch points the recognizer requires.
    pub fn touch_points(&self) -> u32 {
        self.touch_points.load(Ordering::Acquire)
    }

    pub fn set_touch_points(&self, points: u32) {
        self.touch_points.store(points, Ordering::Release);
    }

    /// Register a pan update handler.
    pub fn on_pan_updated<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&PanUpdate) + Send + Sync + 'static,
    {
        let id = HandlerId(self.next_handler_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.handlers).push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn remove_handler(&self, id: HandlerId) -> bool {
        let mut handlers = lock(&self.handlers);
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn handler_count(&self) -> usize {
        lock(&self.handlers).len()
    }

    /// Deliver a pan update to every handler.
    ///
    /// Called by the host's gesture system, from any thread. Handlers are
    /// snapshotted first so a handler may add or remove handlers.
    pub fn send_pan_updated(&self, update: &PanUpdate) {
        let handlers: Vec<PanHandler> = lock(&self.handlers)
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            handler(update);
        }
    }
}

impl fmt::Debug for PanGestureRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanGestureRecognizer")
            .field("touch_points", &self.touch_points())
            .field("handlers", &self.handler_count())
            .finish()
    }
}

// =============================================================================
// RECOGNIZER SET
// =============================================================================

/// The gesture recognizers attached to one visual node.
///
/// Membership is by pointer identity. Adding the same recognizer twice
/// attaches it twice, like a plain list.
#[derive(Default)]
pub struct GestureRecognizers {
    items: Mutex<Vec<Arc<PanGestureRecognizer>>>,
}

impl GestureRecognizers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, recognizer: Arc<PanGestureRecognizer>) {
        lock(&self.items).push(recognizer);
    }

    /// Remove one attachment of `recognizer`. Returns false if it was not attached.
    pub fn remove(&self, recognizer: &Arc<PanGestureRecognizer>) -> bool {
        let mut items = lock(&self.items);
        match items.iter().position(|r| Arc::ptr_eq(r, recognizer)) {
            Some(pos) => {
                items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, recognizer: &Arc<PanGestureRecognizer>) -> bool {
        lock(&self.items).iter().any(|r| Arc::ptr_eq(r, recognizer))
    }

    /// How many times `recognizer` is attached.
    pub fn count_of(&self, recognizer: &Arc<PanGestureRecognizer>) -> usize {
        lock(&self.items)
            .iter()
            .filter(|r| Arc::ptr_eq(r, recognizer))
            .count()
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for GestureRecognizers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureRecognizers")
            .field("len", &self.len())
            .finish()
    }
}

// =============================================================================
// VISUAL NODES
// =============================================================================

/// A host-supplied visual node that a card can hold as its content.
///
/// The card never looks inside a node. It only needs the current width and
/// the node's recognizer set.
pub trait VisualNode: Send + Sync {
    /// Current laid-out width.
    fn width(&self) -> f64;

    /// Recognizers attached to this node.
    fn gesture_recognizers(&self) -> &GestureRecognizers;
}

/// Shared handle to a content node.
///
/// Equality is pointer identity: two handles are equal only when they point at
/// the same node, whatever the node's contents.
#[derive(Clone)]
pub struct ContentRef(Arc<dyn VisualNode>);

impl ContentRef {
    pub fn new<V: VisualNode + 'static>(node: V) -> Self {
        Self(Arc::new(node))
    }

    pub fn from_arc<V: VisualNode + 'static>(node: Arc<V>) -> Self {
        Self(node)
    }

    pub fn width(&self) -> f64 {
        self.0.width()
    }

    pub fn gesture_recognizers(&self) -> &GestureRecognizers {
        self.0.gesture_recognizers()
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl PartialEq for ContentRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRef")
            .field("ptr", &Arc::as_ptr(&self.0).cast::<()>())
            .field("width", &self.width())
            .finish()
    }
}

/// Plain content node with a settable width.
///
/// Enough for hosts that lay out elsewhere and just report sizes back, and
/// for tests.
#[derive(Debug)]
pub struct View {
    label: String,
    width: AtomicU64,
    recognizers: GestureRecognizers,
}

impl View {
    pub fn new(label: impl Into<String>, width: f64) -> Self {
        Self {
            label: label.into(),
            width: AtomicU64::new(width.to_bits()),
            recognizers: GestureRecognizers::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Report a new laid-out width. Safe from any thread.
    pub fn set_width(&self, width: f64) {
        self.width.store(width.to_bits(), Ordering::Release);
    }
}

impl VisualNode for View {
    fn width(&self) -> f64 {
        f64::from_bits(self.width.load(Ordering::Acquire))
    }

    fn gesture_recognizers(&self) -> &GestureRecognizers {
        &self.recognizers
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn test_handlers_receive_updates() {
        let recognizer = PanGestureRecognizer::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        recognizer.on_pan_updated(move |update| {
            seen_clone.lock().unwrap().push(update.total_x);
        });

        recognizer.send_pan_updated(&PanUpdate::running(12.0, 0.0));
        recognizer.send_pan_updated(&PanUpdate::running(-30.0, 4.0));

        assert_eq!(*seen.lock().unwrap(), vec![12.0, -30.0]);
    }

    #[test]
    fn test_remove_handler() {
        let recognizer = PanGestureRecognizer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        let id = recognizer.on_pan_updated(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(recognizer.remove_handler(id));
        assert!(!recognizer.remove_handler(id));

        recognizer.send_pan_updated(&PanUpdate::running(1.0, 0.0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(recognizer.handler_count(), 0);
    }

    #[test]
    fn test_updates_from_other_thread() {
        let recognizer = PanGestureRecognizer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        recognizer.on_pan_updated(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let remote = recognizer.clone();
        thread::spawn(move || {
            remote.send_pan_updated(&PanUpdate::started());
            remote.send_pan_updated(&PanUpdate::running(5.0, 0.0));
        })
        .join()
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_recognizer_set_identity() {
        let set = GestureRecognizers::new();
        let a = PanGestureRecognizer::new();
        let b = PanGestureRecognizer::new();

        set.add(a.clone());
        assert!(set.contains(&a));
        assert!(!set.contains(&b));

        // Removing something never attached is a no-op
        assert!(!set.remove(&b));
        assert_eq!(set.len(), 1);

        assert!(set.remove(&a));
        assert!(set.is_empty());
    }

    #[test]
    fn test_content_ref_identity() {
        let first = ContentRef::new(View::new("a", 100.0));
        let twin = ContentRef::new(View::new("a", 100.0));

        assert_eq!(first, first.clone());
        assert_ne!(first, twin);
    }

    #[test]
    fn test_view_width_updates() {
        let view = Arc::new(View::new("row", 100.0));
        let content = ContentRef::from_arc(view.clone());

        assert_eq!(content.width(), 100.0);
        view.set_width(250.0);
        assert_eq!(content.width(), 250.0);
        assert_eq!(view.label(), "row");
    }
}
