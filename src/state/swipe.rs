//! Swipe Module - swipe-to-clear state machine
//!
//! Two states:
//! - `Inactive`: the recognizer is not attached anywhere and nobody listens
//! - `Active`: the recognizer sits in the content's recognizer set and every
//!   pan update, whatever its phase, is checked against the clear threshold
//!
//! The check runs on whatever thread delivers the drag. The clear itself is
//! handed to the main context and applied there through the card registry.
//!
//! # Threshold
//!
//! `threshold = content_width * ratio`, ratio 4/5 by default. A drag whose
//! `|total_x|` is *below* the threshold clears the content; a drag at or past
//! it does nothing. That reads backwards for a feature called swipe to clear,
//! and it is kept exactly as is until product intent says otherwise.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace, warn};

use super::dispatch::Dispatcher;
use super::gesture::{ContentRef, HandlerId, PanGestureRecognizer, PanUpdate};
use crate::config::SwipeConfig;
use crate::engine::registry::{self, CardId};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Simultaneous touch points the swipe recognizer requires.
pub const SWIPE_TOUCH_POINTS: u32 = 1;

/// Default fraction of the content width used as the clear threshold.
pub const DEFAULT_THRESHOLD_RATIO: f64 = 4.0 / 5.0;

// =============================================================================
// THRESHOLD
// =============================================================================

/// Displacement threshold for content of the given width.
pub fn clear_threshold(content_width: f64, ratio: f64) -> f64 {
    content_width * ratio
}

/// Whether a drag with cumulative displacement `total_x` clears the content.
///
/// Under the threshold clears. See the module docs.
pub fn drag_clears_content(total_x: f64, content_width: f64, ratio: f64) -> bool {
    total_x.abs() < clear_threshold(content_width, ratio)
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeState {
    Inactive,
    Active,
}

/// What drag handlers on other threads may read.
struct SwipeShared {
    /// Content the recognizer is currently attached to.
    target: Mutex<Option<ContentRef>>,
    /// Bumped on every activation and deactivation.
    generation: AtomicU64,
}

impl SwipeShared {
    fn target(&self) -> Option<ContentRef> {
        self.target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_target(&self, content: Option<ContentRef>) -> Option<ContentRef> {
        std::mem::replace(
            &mut *self.target.lock().unwrap_or_else(PoisonError::into_inner),
            content,
        )
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// One per card. Created once; activated and deactivated, never rebuilt.
pub struct SwipeController {
    card: CardId,
    recognizer: Arc<PanGestureRecognizer>,
    shared: Arc<SwipeShared>,
    dispatcher: Dispatcher,
    threshold_ratio: f64,
    state: Cell<SwipeState>,
    handler: Cell<Option<HandlerId>>,
}

impl SwipeController {
    pub fn new(card: CardId, dispatcher: Dispatcher, config: &SwipeConfig) -> Self {
        Self {
            card,
            recognizer: PanGestureRecognizer::new(),
            shared: Arc::new(SwipeShared {
                target: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
            dispatcher,
            threshold_ratio: config.threshold_ratio,
            state: Cell::new(SwipeState::Inactive),
            handler: Cell::new(None),
        }
    }

    pub fn state(&self) -> SwipeState {
        self.state.get()
    }

    pub fn is_active(&self) -> bool {
        self.state.get() == SwipeState::Active
    }

    /// The one recognizer this controller ever attaches.
    pub fn recognizer(&self) -> &Arc<PanGestureRecognizer> {
        &self.recognizer
    }

    pub fn threshold_ratio(&self) -> f64 {
        self.threshold_ratio
    }

    /// Current activation generation.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    /// Content the recognizer is attached to right now.
    pub fn attached_target(&self) -> Option<ContentRef> {
        self.shared.target()
    }

    /// Whether a clear from drag generation `generation` should still apply.
    pub fn accepts(&self, generation: u64) -> bool {
        self.is_active() && generation == self.generation()
    }

    /// Inactive → Active. Attaches to `content` if there is any.
    pub fn activate(&self, content: Option<&ContentRef>) {
        if self.is_active() {
            return;
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.recognizer.set_touch_points(SWIPE_TOUCH_POINTS);

        if let Some(content) = content {
            content.gesture_recognizers().add(self.recognizer.clone());
        }
        self.shared.replace_target(content.cloned());

        let handler = self.recognizer.on_pan_updated(self.drag_handler(generation));
        self.handler.set(Some(handler));
        self.state.set(SwipeState::Active);

        debug!(card = %self.card, generation, attached = content.is_some(), "swipe activated");
    }

    /// Active → Inactive. Detaches and abandons any drag in flight.
    pub fn deactivate(&self) {
        if !self.is_active() {
            return;
        }

        self.detach();
        if let Some(handler) = self.handler.take() {
            self.recognizer.remove_handler(handler);
        }
        // Clears already queued for the main context carry the old generation
        let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.state.set(SwipeState::Inactive);

        debug!(card = %self.card, generation, "swipe deactivated");
    }

    /// Remove the recognizer from whatever it is attached to. The state does
    /// not change. No-op when nothing is attached.
    pub fn detach(&self) {
        if let Some(previous) = self.shared.replace_target(None) {
            previous.gesture_recognizers().remove(&self.recognizer);
        }
    }

    /// Follow the card's content while active: move the recognizer from the
    /// old content to `content`.
    pub fn retarget(&self, content: Option<&ContentRef>) {
        if !self.is_active() {
            return;
        }

        let current = self.shared.target();
        if current.as_ref() == content {
            return;
        }

        self.detach();
        if let Some(content) = content {
            content.gesture_recognizers().add(self.recognizer.clone());
        }
        self.shared.replace_target(content.cloned());

        trace!(card = %self.card, attached = content.is_some(), "swipe retargeted");
    }

    /// Build the drag handler for one activation.
    ///
    /// Runs off the main thread: reads only the shared target and hands the
    /// clear over to the dispatcher.
    fn drag_handler(&self, generation: u64) -> impl Fn(&PanUpdate) + Send + Sync + use<> {
        let card = self.card;
        let shared = self.shared.clone();
        let dispatcher = self.dispatcher.clone();
        let ratio = self.threshold_ratio;

        // Every phase is checked, including start and end
        move |update: &PanUpdate| {
            // Content already gone: nothing to clear
            let Some(target) = shared.target() else {
                trace!(card = %card, "drag with no attached content");
                return;
            };

            let width = target.width();
            if !drag_clears_content(update.total_x, width, ratio) {
                return;
            }

            debug!(card = %card, status = ?update.status, total_x = update.total_x, width, "drag clears content");
            let dispatched = dispatcher.dispatch(move || {
                registry::with_swipe_target(card, |t| t.clear_swiped_content(generation));
            });
            if let Err(err) = dispatched {
                warn!(card = %card, %err, "dropping swipe clear");
            }
        }
    }
}

impl Drop for SwipeController {
    fn drop(&mut self) {
        self.deactivate();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::dispatch::MainContext;
    use crate::state::gesture::{PanStatus, View};

    fn controller(ctx: &MainContext) -> SwipeController {
        SwipeController::new(
            registry::allocate_card_id(),
            ctx.dispatcher(),
            &SwipeConfig::default(),
        )
    }

    #[test]
    fn test_threshold_is_four_fifths() {
        assert_eq!(clear_threshold(100.0, DEFAULT_THRESHOLD_RATIO), 80.0);
    }

    #[test]
    fn test_under_threshold_clears() {
        // Inverted on purpose: staying under the threshold is what clears
        assert!(drag_clears_content(70.0, 100.0, DEFAULT_THRESHOLD_RATIO));
        assert!(drag_clears_content(-70.0, 100.0, DEFAULT_THRESHOLD_RATIO));
        assert!(!drag_clears_content(80.0, 100.0, DEFAULT_THRESHOLD_RATIO));
        assert!(!drag_clears_content(-90.0, 100.0, DEFAULT_THRESHOLD_RATIO));
    }

    #[test]
    fn test_activate_attaches_once() {
        let ctx = MainContext::new();
        let swipe = controller(&ctx);
        let content = ContentRef::new(View::new("c", 100.0));

        swipe.activate(Some(&content));
        swipe.activate(Some(&content));

        assert!(swipe.is_active());
        assert_eq!(content.gesture_recognizers().count_of(swipe.recognizer()), 1);
        assert_eq!(swipe.recognizer().touch_points(), SWIPE_TOUCH_POINTS);
        assert_eq!(swipe.recognizer().handler_count(), 1);
    }

    #[test]
    fn test_deactivate_detaches() {
        let ctx = MainContext::new();
        let swipe = controller(&ctx);
        let content = ContentRef::new(View::new("c", 100.0));

        swipe.activate(Some(&content));
        swipe.deactivate();
        swipe.deactivate();

        assert_eq!(swipe.state(), SwipeState::Inactive);
        assert!(content.gesture_recognizers().is_empty());
        assert_eq!(swipe.recognizer().handler_count(), 0);
        assert!(swipe.attached_target().is_none());
    }

    #[test]
    fn test_activate_without_content() {
        let ctx = MainContext::new();
        let swipe = controller(&ctx);

        swipe.activate(None);
        assert!(swipe.is_active());

        // No content: drags are ignored, nothing is queued
        swipe.recognizer().send_pan_updated(&PanUpdate::running(1.0, 0.0));
        assert_eq!(ctx.run_pending(), 0);
    }

    #[test]
    fn test_drag_queues_clear_only_under_threshold() {
        let ctx = MainContext::new();
        let swipe = controller(&ctx);
        let content = ContentRef::new(View::new("c", 100.0));
        swipe.activate(Some(&content));

        swipe.recognizer().send_pan_updated(&PanUpdate::running(90.0, 0.0));
        assert_eq!(ctx.run_pending(), 0);

        swipe.recognizer().send_pan_updated(&PanUpdate::running(70.0, 0.0));
        assert_eq!(ctx.run_pending(), 1);
    }

    #[test]
    fn test_every_phase_is_checked() {
        let ctx = MainContext::new();
        let swipe = controller(&ctx);
        let content = ContentRef::new(View::new("c", 100.0));
        swipe.activate(Some(&content));

        // Zero displacement is under the threshold whatever the phase
        swipe.recognizer().send_pan_updated(&PanUpdate::started());
        swipe.recognizer().send_pan_updated(&PanUpdate::completed());
        swipe.recognizer().send_pan_updated(&PanUpdate::canceled());
        assert_eq!(ctx.run_pending(), 3);

        swipe.recognizer().send_pan_updated(&PanUpdate::new(PanStatus::Completed, 95.0, 0.0));
        assert_eq!(ctx.run_pending(), 0);
    }

    #[test]
    fn test_generation_tracks_activations() {
        let ctx = MainContext::new();
        let swipe = controller(&ctx);

        swipe.activate(None);
        let first = swipe.generation();
        assert!(swipe.accepts(first));

        swipe.deactivate();
        assert!(!swipe.accepts(first));

        swipe.activate(None);
        assert!(!swipe.accepts(first));
        assert!(swipe.accepts(swipe.generation()));
    }

    #[test]
    fn test_retarget_moves_recognizer() {
        let ctx = MainContext::new();
        let swipe = controller(&ctx);
        let a = ContentRef::new(View::new("a", 100.0));
        let b = ContentRef::new(View::new("b", 100.0));

        swipe.activate(Some(&a));
        swipe.retarget(Some(&b));

        assert!(a.gesture_recognizers().is_empty());
        assert!(b.gesture_recognizers().contains(swipe.recognizer()));
        assert_eq!(swipe.attached_target(), Some(b.clone()));

        swipe.retarget(None);
        assert!(b.gesture_recognizers().is_empty());
    }

    #[test]
    fn test_retarget_ignored_while_inactive() {
        let ctx = MainContext::new();
        let swipe = controller(&ctx);
        let a = ContentRef::new(View::new("a", 100.0));

        swipe.retarget(Some(&a));
        assert!(a.gesture_recognizers().is_empty());
    }

    #[test]
    fn test_drop_detaches() {
        let ctx = MainContext::new();
        let content = ContentRef::new(View::new("c", 100.0));
        {
            let swipe = controller(&ctx);
            swipe.activate(Some(&content));
            assert_eq!(content.gesture_recognizers().len(), 1);
        }
        assert!(content.gesture_recognizers().is_empty());
    }
}
