//! Card - a content slot inside two nested frames, with swipe to clear.
//!
//! A card is built once from an outer and an inner frame and never rebuilt.
//! Every attribute write goes through the property store, whose mutators
//! forward the value to the frames (see [`Composition`]) or switch the swipe
//! controller.
//!
//! # Example
//!
//! ```ignore
//! use spark_card::primitives::CardView;
//! use spark_card::state::{ContentRef, MainContext, PanUpdate, View};
//!
//! let ctx = MainContext::new();
//! let card = CardView::in_memory(&ctx);
//!
//! let content = ContentRef::new(View::new("body", 100.0));
//! card.set_content(Some(content.clone()));
//! card.set_swipe_to_clear_enabled(true);
//!
//! // Any thread
//! card.swipe_recognizer().send_pan_updated(&PanUpdate::running(70.0, 0.0));
//!
//! // Main thread
//! ctx.run_pending();
//! assert!(card.content().is_none());
//! ```

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use tracing::debug;

use super::composition::Composition;
use super::frame::{Frame, MemoryFrame};
use crate::config::{CardConfig, SwipeConfig};
use crate::engine::property::Mutator;
use crate::engine::registry::{self, CardId, SwipeTarget};
use crate::engine::store::{AttrValue, PropertyStore, StoreMutators};
use crate::error::Result;
use crate::state::dispatch::MainContext;
use crate::state::gesture::{ContentRef, PanGestureRecognizer};
use crate::state::swipe::{SwipeController, SwipeState};
use crate::types::{AttrFlags, AttrKind, EdgeInsets, HorizontalAlignment, Rgba};

/// Cleanup function returned by [`CardView::on_change`].
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Card State
// =============================================================================

struct CardInner<F: Frame> {
    id: CardId,
    composition: RefCell<Composition<F>>,
    store: PropertyStore,
    swipe: SwipeController,
}

impl<F: Frame> SwipeTarget for CardInner<F> {
    fn clear_swiped_content(&self, generation: u64) {
        if !self.swipe.accepts(generation) {
            debug!(card = %self.id, generation, "discarding stale swipe clear");
            return;
        }

        self.swipe.detach();
        self.store.content.set(None);
        debug!(card = %self.id, "content cleared by swipe");
    }
}

impl<F: Frame> Drop for CardInner<F> {
    fn drop(&mut self) {
        registry::release_card(self.id);
    }
}

/// Mutator that applies the value to the composition, if the card is alive.
fn frame_mutator<F, T>(
    card: &Weak<CardInner<F>>,
    apply: impl Fn(&mut Composition<F>, &T) + 'static,
) -> Mutator<T>
where
    F: Frame,
    T: 'static,
{
    let card = card.clone();
    Box::new(move |value: &T| {
        if let Some(card) = card.upgrade() {
            apply(&mut *card.composition.borrow_mut(), value);
        }
    })
}

fn store_mutators<F: Frame>(card: &Weak<CardInner<F>>) -> StoreMutators {
    let content_card = card.clone();
    let swipe_card = card.clone();

    StoreMutators {
        content: Box::new(move |content: &Option<ContentRef>| {
            let Some(card) = content_card.upgrade() else {
                return;
            };
            card.composition.borrow_mut().set_content(content.as_ref());
            card.swipe.retarget(content.as_ref());
        }),
        horizontal_alignment: frame_mutator(card, |comp, alignment: &HorizontalAlignment| {
            comp.set_horizontal_alignment(*alignment)
        }),
        height_request: frame_mutator(card, |comp, height: &f64| comp.set_height_request(*height)),
        outer_fill_color: frame_mutator(card, |comp, color: &Rgba| comp.set_outer_background(*color)),
        inner_fill_color: frame_mutator(card, |comp, color: &Rgba| comp.set_inner_background(*color)),
        outer_padding: frame_mutator(card, |comp, padding: &EdgeInsets| {
            comp.set_outer_padding(*padding)
        }),
        inner_padding: frame_mutator(card, |comp, padding: &EdgeInsets| {
            comp.set_inner_padding(*padding)
        }),
        has_shadow: frame_mutator(card, |comp, shadow: &bool| comp.set_has_shadow(*shadow)),
        swipe_to_clear_enabled: Box::new(move |enabled: &bool| {
            let Some(card) = swipe_card.upgrade() else {
                return;
            };
            if *enabled {
                card.swipe.activate(card.store.content.get().as_ref());
            } else {
                card.swipe.deactivate();
            }
        }),
    }
}

// =============================================================================
// Card View
// =============================================================================

/// A card. Cheap to clone; clones share the same card.
///
/// Lives on the thread that owns `ctx`. The card is released from the
/// registry when the last clone is dropped.
pub struct CardView<F: Frame = MemoryFrame> {
    inner: Rc<CardInner<F>>,
}

impl<F: Frame> Clone for CardView<F> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<F: Frame> CardView<F> {
    /// Build a card from two frames with default attributes.
    pub fn new(outer: F, inner: F, ctx: &MainContext) -> Self {
        Self::build(outer, inner, ctx, &SwipeConfig::default())
    }

    /// Build a card and apply `config` through the normal setters.
    pub fn with_config(outer: F, inner: F, ctx: &MainContext, config: &CardConfig) -> Result<Self> {
        config.validate()?;

        let card = Self::build(outer, inner, ctx, &config.swipe);
        for value in config.attribute_values() {
            card.inner.store.set(value);
        }
        Ok(card)
    }

    fn build(outer: F, inner: F, ctx: &MainContext, swipe: &SwipeConfig) -> Self {
        let id = registry::allocate_card_id();
        let composition = Composition::new(outer, inner);

        let card = Rc::new_cyclic(|weak: &Weak<CardInner<F>>| CardInner {
            id,
            composition: RefCell::new(composition),
            store: PropertyStore::new(store_mutators(weak)),
            swipe: SwipeController::new(id, ctx.dispatcher(), swipe),
        });

        let target: Weak<dyn SwipeTarget> = Rc::downgrade(&card) as Weak<dyn SwipeTarget>;
        registry::register_card(id, target);
        debug!(card = %id, "card created");

        Self { inner: card }
    }

    pub fn id(&self) -> CardId {
        self.inner.id
    }

    /// The attribute store, for signals and by-key access.
    pub fn properties(&self) -> &PropertyStore {
        &self.inner.store
    }

    pub fn get(&self, kind: AttrKind) -> AttrValue {
        self.inner.store.get(kind)
    }

    /// Returns `true` if the value changed.
    pub fn set(&self, value: AttrValue) -> bool {
        self.inner.store.set(value)
    }

    /// Call `f` after any attribute in `mask` changed.
    pub fn on_change<C>(&self, mask: AttrFlags, f: C) -> Cleanup
    where
        C: Fn(AttrKind) + 'static,
    {
        let observers = self.inner.store.observers();
        let id = observers.subscribe(mask, Rc::new(f));
        let observers = Rc::downgrade(observers);

        Box::new(move || {
            if let Some(observers) = observers.upgrade() {
                observers.unsubscribe(id);
            }
        })
    }

    pub fn outer_frame(&self) -> Ref<'_, F> {
        Ref::map(self.inner.composition.borrow(), Composition::outer)
    }

    pub fn inner_frame(&self) -> Ref<'_, F> {
        Ref::map(self.inner.composition.borrow(), Composition::inner)
    }

    pub fn swipe_state(&self) -> SwipeState {
        self.inner.swipe.state()
    }

    /// The recognizer swipe to clear attaches to the content. Hosts deliver
    /// pan updates through it.
    pub fn swipe_recognizer(&self) -> &Arc<PanGestureRecognizer> {
        self.inner.swipe.recognizer()
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn content(&self) -> Option<ContentRef> {
        self.inner.store.content.get()
    }

    pub fn set_content(&self, content: Option<ContentRef>) -> bool {
        self.inner.store.content.set(content)
    }

    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.inner.store.horizontal_alignment.get()
    }

    pub fn set_horizontal_alignment(&self, alignment: HorizontalAlignment) -> bool {
        self.inner.store.horizontal_alignment.set(alignment)
    }

    pub fn height_request(&self) -> f64 {
        self.inner.store.height_request.get()
    }

    /// Negative means unconstrained.
    pub fn set_height_request(&self, height: f64) -> bool {
        self.inner.store.height_request.set(height)
    }

    pub fn outer_fill_color(&self) -> Rgba {
        self.inner.store.outer_fill_color.get()
    }

    pub fn set_outer_fill_color(&self, color: Rgba) -> bool {
        self.inner.store.outer_fill_color.set(color)
    }

    pub fn inner_fill_color(&self) -> Rgba {
        self.inner.store.inner_fill_color.get()
    }

    pub fn set_inner_fill_color(&self, color: Rgba) -> bool {
        self.inner.store.inner_fill_color.set(color)
    }

    pub fn outer_padding(&self) -> EdgeInsets {
        self.inner.store.outer_padding.get()
    }

    pub fn set_outer_padding(&self, padding: EdgeInsets) -> bool {
        self.inner.store.outer_padding.set(padding)
    }

    pub fn inner_padding(&self) -> EdgeInsets {
        self.inner.store.inner_padding.get()
    }

    pub fn set_inner_padding(&self, padding: EdgeInsets) -> bool {
        self.inner.store.inner_padding.set(padding)
    }

    pub fn has_shadow(&self) -> bool {
        self.inner.store.has_shadow.get()
    }

    pub fn set_has_shadow(&self, has_shadow: bool) -> bool {
        self.inner.store.has_shadow.set(has_shadow)
    }

    pub fn swipe_to_clear_enabled(&self) -> bool {
        self.inner.store.swipe_to_clear_enabled.get()
    }

    pub fn set_swipe_to_clear_enabled(&self, enabled: bool) -> bool {
        self.inner.store.swipe_to_clear_enabled.set(enabled)
    }
}

impl CardView<MemoryFrame> {
    /// A card over two fresh [`MemoryFrame`]s.
    pub fn in_memory(ctx: &MainContext) -> Self {
        Self::new(MemoryFrame::new(), MemoryFrame::new(), ctx)
    }
}

impl<F: Frame> fmt::Debug for CardView<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardView")
            .field("id", &self.inner.id)
            .field("swipe", &self.inner.swipe.state())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::frame::{FrameChild, FrameWrite};
    use crate::state::gesture::{PanUpdate, View};
    use std::cell::Cell;

    fn content(width: f64) -> ContentRef {
        ContentRef::new(View::new("content", width))
    }

    fn swipe_card(ctx: &MainContext, width: f64) -> (CardView, ContentRef) {
        let card = CardView::in_memory(ctx);
        let content = content(width);
        card.set_content(Some(content.clone()));
        card.set_swipe_to_clear_enabled(true);
        (card, content)
    }

    #[test]
    fn test_construction_defaults() {
        let ctx = MainContext::new();
        let card = CardView::in_memory(&ctx);

        assert!(registry::is_registered(card.id()));
        assert_eq!(card.swipe_state(), SwipeState::Inactive);
        assert_eq!(card.outer_frame().state().child, FrameChild::Frame(card.inner_frame().id()));
        assert_eq!(card.inner_frame().state().child, FrameChild::Empty);
        for kind in AttrKind::ALL {
            assert_eq!(card.get(kind), AttrValue::default_for(kind));
        }
    }

    #[test]
    fn test_same_value_never_reaches_frames() {
        let ctx = MainContext::new();
        let card = CardView::in_memory(&ctx);
        let changes = Rc::new(Cell::new(0));

        let c = changes.clone();
        let _cleanup = card.on_change(AttrFlags::all(), move |_| c.set(c.get() + 1));

        let outer_writes = card.outer_frame().writes().len();
        let inner_writes = card.inner_frame().writes().len();

        for kind in AttrKind::ALL {
            assert!(!card.set(AttrValue::default_for(kind)));
        }

        assert_eq!(changes.get(), 0);
        assert_eq!(card.outer_frame().writes().len(), outer_writes);
        assert_eq!(card.inner_frame().writes().len(), inner_writes);
    }

    #[test]
    fn test_height_reaches_both_frames() {
        let ctx = MainContext::new();
        let card = CardView::in_memory(&ctx);

        for height in [48.0, 0.0, -1.0, 120.5] {
            card.set_height_request(height);
            assert_eq!(card.outer_frame().state().height_request, height);
            assert_eq!(card.inner_frame().state().height_request, height);
        }
    }

    #[test]
    fn test_fill_colors_are_independent() {
        let ctx = MainContext::new();
        let card = CardView::in_memory(&ctx);
        let inner_bg_writes = card.inner_frame().write_count(FrameWrite::Background);

        card.set_outer_fill_color(Rgba::RED);
        assert_eq!(card.outer_frame().state().background, Rgba::RED);
        assert_eq!(card.inner_frame().state().background, Rgba::TRANSPARENT);
        assert_eq!(card.inner_frame().write_count(FrameWrite::Background), inner_bg_writes);

        let outer_bg_writes = card.outer_frame().write_count(FrameWrite::Background);
        card.set_inner_fill_color(Rgba::BLUE);
        assert_eq!(card.inner_frame().state().background, Rgba::BLUE);
        assert_eq!(card.outer_frame().state().background, Rgba::RED);
        assert_eq!(card.outer_frame().write_count(FrameWrite::Background), outer_bg_writes);
    }

    #[test]
    fn test_content_lands_in_inner_frame() {
        let ctx = MainContext::new();
        let card = CardView::in_memory(&ctx);
        let body = content(50.0);

        card.set_content(Some(body.clone()));
        assert_eq!(card.inner_frame().content(), Some(&body));
        assert_eq!(card.outer_frame().state().child, FrameChild::Frame(card.inner_frame().id()));

        card.set_content(None);
        assert_eq!(card.inner_frame().state().child, FrameChild::Empty);
    }

    #[test]
    fn test_swipe_toggle_attaches_exactly_once() {
        let ctx = MainContext::new();
        let card = CardView::in_memory(&ctx);
        let body = content(100.0);
        card.set_content(Some(body.clone()));

        card.set_swipe_to_clear_enabled(true);
        card.set_swipe_to_clear_enabled(true);
        assert_eq!(body.gesture_recognizers().count_of(card.swipe_recognizer()), 1);
        assert_eq!(card.swipe_recognizer().touch_points(), 1);
        assert_eq!(card.swipe_state(), SwipeState::Active);

        card.set_swipe_to_clear_enabled(false);
        card.set_swipe_to_clear_enabled(false);
        assert!(body.gesture_recognizers().is_empty());
        assert_eq!(card.swipe_state(), SwipeState::Inactive);

        card.set_swipe_to_clear_enabled(true);
        assert_eq!(body.gesture_recognizers().count_of(card.swipe_recognizer()), 1);
    }

    #[test]
    fn test_short_drag_clears_content() {
        // Inverted on purpose: 70 is under the 80 threshold, and that clears
        let ctx = MainContext::new();
        let (card, body) = swipe_card(&ctx, 100.0);

        card.swipe_recognizer().send_pan_updated(&PanUpdate::running(70.0, 0.0));
        assert!(card.content().is_some());

        assert_eq!(ctx.run_pending(), 1);
        assert!(card.content().is_none());
        assert_eq!(card.inner_frame().state().child, FrameChild::Empty);
        assert!(body.gesture_recognizers().is_empty());
        assert_eq!(card.swipe_state(), SwipeState::Active);
    }

    #[test]
    fn test_long_drag_keeps_content() {
        let ctx = MainContext::new();
        let (card, body) = swipe_card(&ctx, 100.0);

        card.swipe_recognizer().send_pan_updated(&PanUpdate::running(90.0, 0.0));
        ctx.run_pending();

        assert_eq!(card.content(), Some(body.clone()));
        assert!(body.gesture_recognizers().contains(card.swipe_recognizer()));
    }

    #[test]
    fn test_store_usable_after_clear() {
        let ctx = MainContext::new();
        let (card, _) = swipe_card(&ctx, 100.0);

        card.swipe_recognizer().send_pan_updated(&PanUpdate::running(10.0, 0.0));
        ctx.run_pending();
        assert!(card.content().is_none());

        let next = content(200.0);
        assert!(card.set_content(Some(next.clone())));
        assert_eq!(card.content(), Some(next.clone()));
        assert_eq!(card.inner_frame().content(), Some(&next));

        // Still active, so the new content picks up the recognizer
        assert!(next.gesture_recognizers().contains(card.swipe_recognizer()));
    }

    #[test]
    fn test_clear_queued_before_disable_is_discarded() {
        let ctx = MainContext::new();
        let (card, body) = swipe_card(&ctx, 100.0);

        card.swipe_recognizer().send_pan_updated(&PanUpdate::running(10.0, 0.0));
        card.set_swipe_to_clear_enabled(false);
        card.set_swipe_to_clear_enabled(true);

        assert_eq!(ctx.run_pending(), 1);
        assert_eq!(card.content(), Some(body));
    }

    #[test]
    fn test_content_swap_moves_recognizer() {
        let ctx = MainContext::new();
        let (card, first) = swipe_card(&ctx, 100.0);
        let second = content(100.0);

        card.set_content(Some(second.clone()));

        assert!(first.gesture_recognizers().is_empty());
        assert_eq!(second.gesture_recognizers().count_of(card.swipe_recognizer()), 1);
    }

    #[test]
    fn test_borders_stay_transparent() {
        let ctx = MainContext::new();
        let (card, _) = swipe_card(&ctx, 100.0);

        card.set_outer_fill_color(Rgba::RED);
        card.set_inner_fill_color(Rgba::GREEN);
        card.set_has_shadow(true);
        card.set_outer_padding(EdgeInsets::uniform(6.0));
        card.set_horizontal_alignment(HorizontalAlignment::Fill);
        card.set_height_request(64.0);

        assert!(card.outer_frame().state().border_color.is_transparent());
        assert!(card.inner_frame().state().border_color.is_transparent());
        assert_eq!(card.outer_frame().write_count(FrameWrite::BorderColor), 1);
        assert_eq!(card.inner_frame().write_count(FrameWrite::BorderColor), 1);
    }

    #[test]
    fn test_on_change_cleanup() {
        let ctx = MainContext::new();
        let card = CardView::in_memory(&ctx);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        let cleanup = card.on_change(AttrFlags::PADDING, move |kind| s.borrow_mut().push(kind));

        card.set_inner_padding(EdgeInsets::uniform(2.0));
        card.set_has_shadow(true);
        assert_eq!(*seen.borrow(), vec![AttrKind::InnerPadding]);

        cleanup();
        card.set_outer_padding(EdgeInsets::uniform(2.0));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_observer_may_set_other_attributes() {
        let ctx = MainContext::new();
        let card = CardView::in_memory(&ctx);

        let follower = card.clone();
        let _cleanup = card.on_change(AttrFlags::HAS_SHADOW, move |_| {
            follower.set_outer_padding(EdgeInsets::uniform(8.0));
        });

        card.set_has_shadow(true);
        assert_eq!(card.outer_frame().state().padding, EdgeInsets::uniform(8.0));
    }

    #[test]
    fn test_clamping_observer_keeps_signal_in_sync() {
        let ctx = MainContext::new();
        let card = CardView::in_memory(&ctx);

        let clamp = card.clone();
        let _cleanup = card.on_change(AttrFlags::HEIGHT_REQUEST, move |_| {
            if clamp.height_request() > 100.0 {
                clamp.set_height_request(100.0);
            }
        });

        card.set_height_request(200.0);

        assert_eq!(card.height_request(), 100.0);
        assert_eq!(card.outer_frame().state().height_request, 100.0);
        assert_eq!(card.inner_frame().state().height_request, 100.0);
        assert_eq!(card.properties().height_request.signal().get(), 100.0);
    }

    #[test]
    fn test_effect_follows_one_attribute() {
        let ctx = MainContext::new();
        let card = CardView::in_memory(&ctx);
        let runs = Rc::new(Cell::new(0));

        let r = runs.clone();
        let height = card.properties().height_request.signal();
        let _stop = spark_signals::effect(move || {
            let _ = height.get();
            r.set(r.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        card.set_has_shadow(true);
        card.set_inner_fill_color(Rgba::WHITE);
        assert_eq!(runs.get(), 1);

        card.set_height_request(30.0);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_with_config() {
        let ctx = MainContext::new();
        let config = CardConfig {
            height_request: 90.0,
            outer_fill_color: Rgba::GRAY,
            has_shadow: true,
            swipe_to_clear_enabled: true,
            ..CardConfig::default()
        };

        let card =
            CardView::with_config(MemoryFrame::new(), MemoryFrame::new(), &ctx, &config).unwrap();

        assert_eq!(card.inner_frame().state().height_request, 90.0);
        assert_eq!(card.outer_frame().state().background, Rgba::GRAY);
        assert!(card.outer_frame().state().has_shadow);
        assert_eq!(card.swipe_state(), SwipeState::Active);
    }

    #[test]
    fn test_with_config_rejects_bad_ratio() {
        let ctx = MainContext::new();
        let mut config = CardConfig::default();
        config.swipe.threshold_ratio = 2.0;

        assert!(
            CardView::with_config(MemoryFrame::new(), MemoryFrame::new(), &ctx, &config).is_err()
        );
    }

    #[test]
    fn test_dropped_card_ignores_queued_clear() {
        let ctx = MainContext::new();
        let (card, body) = swipe_card(&ctx, 100.0);
        let id = card.id();
        let recognizer = card.swipe_recognizer().clone();

        // Handler is still subscribed at this point
        recognizer.send_pan_updated(&PanUpdate::running(10.0, 0.0));
        drop(card);

        assert!(!registry::is_registered(id));
        assert!(body.gesture_recognizers().is_empty());
        assert_eq!(ctx.run_pending(), 1);
    }
}
