//! Card Engine - attributes, the property store, and the card registry.
//!
//! - Property: a single attribute with its mutator, observers and signal mirror
//! - Store: the nine card attributes, addressable by field or by key
//! - Registry: card ids and lookup for work arriving from other threads
//!
//! # Architecture
//!
//! A write flows one way:
//!
//! ```text
//! set(value) → identity check → mutator → change observers → signal mirror
//! ```
//!
//! Nothing is batched. Everything runs on the thread that owns the card.

pub mod property;
pub mod registry;
pub mod store;

pub use property::{Attribute, ChangeCallback, ChangeObservers, Identity, Mutator};
pub use registry::{
    allocate_card_id, is_registered, register_card, registered_count, release_card,
    reset_registry, with_swipe_target, CardId, SwipeTarget,
};
pub use store::{AttrValue, PropertyStore, StoreMutators};
