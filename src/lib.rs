//! # spark-card
//!
//! A reactive card component: a content slot inside two nested frames, with
//! swipe to clear.
//!
//! Attribute mirrors are [spark-signals](https://github.com/RLabs-Inc/spark-signals)
//! signals, so effects and deriveds can follow any attribute.
//!
//! ## Architecture
//!
//! ```text
//! CardView ─ PropertyStore ─ mutators ─→ Composition (outer Frame → inner Frame → content)
//!          └ SwipeController ─ PanGestureRecognizer (any thread)
//!                            └ Dispatcher ─→ MainContext ─→ card registry ─→ clear content
//! ```
//!
//! Every attribute write runs synchronously on the card's thread. Pan updates
//! may arrive on any thread; the resulting clear always runs on the main
//! context.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, EdgeInsets, HorizontalAlignment, AttrKind, AttrFlags)
//! - [`engine`] - Attributes, the property store, the card registry
//! - [`primitives`] - The Frame capability, the composition, the card
//! - [`state`] - Gesture recognizers, main-context dispatch, swipe state machine
//! - [`layout`] - Taffy-backed frames
//! - [`config`] - TOML card configuration
//! - [`error`] - Error type

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{CardConfig, SwipeConfig};
pub use error::{CardError, Result};

pub use engine::{AttrValue, CardId, PropertyStore};

pub use layout::{compute_frame_layout, frame_tree, FrameTree, TaffyFrame};

pub use primitives::{CardView, Cleanup, Composition, Frame, MemoryFrame};

pub use state::{
    ContentRef, Dispatcher, MainContext, PanGestureRecognizer, PanStatus, PanUpdate, SwipeState,
    View, VisualNode,
};
