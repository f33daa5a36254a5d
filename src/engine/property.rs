//! Attribute - a single reactive property with a dedicated mutator.
//!
//! Each attribute owns its current value, one mutator, and a signal mirror.
//! Setting a value that is identical to the current one does nothing.
//! Setting a different one runs the mutator exactly once, synchronously,
//! then notifies change observers, then updates the signal mirror.
//!
//! There is no batching and no reentrancy guard: a mutator or observer that
//! sets another attribute runs that attribute's mutator right there in the
//! same call stack.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::trace;

use crate::state::gesture::ContentRef;
use crate::types::{AttrFlags, AttrKind, EdgeInsets, HorizontalAlignment, Rgba};

// =============================================================================
// Identity
// =============================================================================

/// Identity used by the store to decide whether a set is a change.
///
/// Reference types compare by pointer, value types by their bits. Two
/// separately created content nodes are different even if they look alike;
/// two `NaN` heights with the same bits are the same.
pub trait Identity {
    fn same_as(&self, other: &Self) -> bool;
}

impl Identity for bool {
    fn same_as(&self, other: &Self) -> bool {
        self == other
    }
}

impl Identity for f64 {
    fn same_as(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Identity for Rgba {
    fn same_as(&self, other: &Self) -> bool {
        self == other
    }
}

impl Identity for HorizontalAlignment {
    fn same_as(&self, other: &Self) -> bool {
        self == other
    }
}

impl Identity for EdgeInsets {
    fn same_as(&self, other: &Self) -> bool {
        self.top.same_as(&other.top)
            && self.left.same_as(&other.left)
            && self.bottom.same_as(&other.bottom)
            && self.right.same_as(&other.right)
    }
}

impl Identity for ContentRef {
    fn same_as(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: Identity> Identity for Option<T> {
    fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_as(b),
            (None, None) => true,
            _ => false,
        }
    }
}

// =============================================================================
// Change Observers
// =============================================================================

/// Change observer callback.
pub type ChangeCallback = Rc<dyn Fn(AttrKind)>;

/// Observers shared by all attributes of one store.
#[derive(Default)]
pub struct ChangeObservers {
    entries: RefCell<Vec<(usize, AttrFlags, ChangeCallback)>>,
    next_id: Cell<usize>,
}

impl ChangeObservers {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Subscribe to changes of the attributes in `mask`. Returns an id for
    /// [`ChangeObservers::unsubscribe`].
    pub fn subscribe(&self, mask: AttrFlags, callback: ChangeCallback) -> usize {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, mask, callback));
        id
    }

    pub fn unsubscribe(&self, id: usize) {
        self.entries.borrow_mut().retain(|(entry_id, _, _)| *entry_id != id);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every observer whose mask includes `kind`.
    pub fn notify(&self, kind: AttrKind) {
        // Collect first so observers may subscribe, unsubscribe or set attributes
        let matching: Vec<ChangeCallback> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, mask, _)| mask.contains_kind(kind))
            .map(|(_, _, callback)| callback.clone())
            .collect();

        for callback in matching {
            callback(kind);
        }
    }
}

// =============================================================================
// Attribute
// =============================================================================

/// Mutator run on every actual change, with the new value.
pub type Mutator<T> = Box<dyn Fn(&T)>;

/// A named, typed, independently observable value.
pub struct Attribute<T: Identity + Clone + PartialEq + 'static> {
    kind: AttrKind,
    value: RefCell<T>,
    mirror: Signal<T>,
    mutator: Mutator<T>,
    observers: Rc<ChangeObservers>,
}

impl<T: Identity + Clone + PartialEq + 'static> Attribute<T> {
    /// Create an attribute holding `default`. The mutator is not run for the
    /// default; whoever owns the visual side applies defaults itself.
    pub fn new(
        kind: AttrKind,
        default: T,
        mutator: Mutator<T>,
        observers: Rc<ChangeObservers>,
    ) -> Self {
        Self {
            kind,
            mirror: signal(default.clone()),
            value: RefCell::new(default),
            mutator,
            observers,
        }
    }

    pub fn kind(&self) -> AttrKind {
        self.kind
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Signal that mirrors this attribute, for use in effects and deriveds.
    ///
    /// The mirror is written after the mutator and the observers ran, so
    /// effects reading it see the frames already updated.
    pub fn signal(&self) -> Signal<T> {
        self.mirror.clone()
    }

    /// Set a new value. Returns `true` if it differed and the mutator ran.
    pub fn set(&self, value: T) -> bool {
        if self.value.borrow().same_as(&value) {
            return false;
        }

        *self.value.borrow_mut() = value.clone();
        trace!(attribute = %self.kind, "attribute changed");

        (self.mutator)(&value);
        self.observers.notify(self.kind);

        // A mutator or observer may have set this attribute again
        self.mirror.set(self.get());
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
