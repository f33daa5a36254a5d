//! Card Registry - id allocation and lookup for live cards.
//!
//! Cards are `!Send`, so work handed over from other threads cannot carry a
//! card. It carries a [`CardId`] instead, and looks the card up here once it
//! runs on the main context.
//!
//! The registry is per thread, like the rest of the engine state. A task
//! only finds cards created on the thread that runs it, which is exactly the
//! main context's thread.
//!
//! Ids are never reused. A task that outlives its card finds nothing rather
//! than some newer card that happened to get the same slot.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

// =============================================================================
// Types
// =============================================================================

/// Identifies a card within its thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u64);

impl CardId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card{}", self.0)
    }
}

/// What the main context can do to a card on behalf of a gesture.
pub trait SwipeTarget {
    /// Clear the card's content after a qualifying drag.
    ///
    /// `generation` is the swipe activation the drag belonged to. Stale
    /// generations are ignored.
    fn clear_swiped_content(&self, generation: u64);
}

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Live cards by id.
    static CARDS: RefCell<HashMap<CardId, Weak<dyn SwipeTarget>>> = RefCell::new(HashMap::new());

    /// Next id to hand out.
    static NEXT_ID: Cell<u64> = const { Cell::new(0) };
}

// =============================================================================
// Registration
// =============================================================================

/// Allocate a fresh id without registering anything yet.
pub fn allocate_card_id() -> CardId {
    NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        CardId(id)
    })
}

/// Register a card under `id`.
pub fn register_card(id: CardId, target: Weak<dyn SwipeTarget>) {
    CARDS.with(|cards| {
        cards.borrow_mut().insert(id, target);
    });
}

/// Remove a card. Unknown ids are ignored.
pub fn release_card(id: CardId) {
    CARDS.with(|cards| {
        cards.borrow_mut().remove(&id);
    });
}

/// Whether `id` is registered on this thread.
pub fn is_registered(id: CardId) -> bool {
    CARDS.with(|cards| cards.borrow().contains_key(&id))
}

/// Number of registered cards on this thread.
pub fn registered_count() -> usize {
    CARDS.with(|cards| cards.borrow().len())
}

/// Run `f` with the card registered under `id`, if it is still alive.
pub fn with_swipe_target<R>(id: CardId, f: impl FnOnce(&dyn SwipeTarget) -> R) -> Option<R> {
    // Upgrade outside the borrow so `f` may register or release cards
    let target: Option<Rc<dyn SwipeTarget>> =
        CARDS.with(|cards| cards.borrow().get(&id).and_then(Weak::upgrade));

    target.map(|target| f(target.as_ref()))
}

/// Drop every registration on this thread. Ids keep counting up.
pub fn reset_registry() {
    CARDS.with(|cards| cards.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================
