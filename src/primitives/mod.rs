//! Card Primitives - frames and the card built from them.
//!
//! - [`Frame`] - the container capability a host provides
//! - [`MemoryFrame`] - in-memory frame that records every write
//! - [`Composition`] - outer frame hosting inner frame hosting content
//! - [`CardView`] - the card: attributes, composition and swipe to clear
//!
//! The composition depends only on [`Frame`]. Any backend works, including
//! [`crate::layout::TaffyFrame`].

mod card;
mod composition;
mod frame;

pub use card::{CardView, Cleanup};
pub use composition::Composition;
pub use frame::{Frame, FrameChild, FrameId, FrameState, FrameWrite, MemoryFrame};
