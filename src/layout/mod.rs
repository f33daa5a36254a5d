//! Card Layout - a Taffy backend for frames.
//!
//! The card itself does no layout. [`TaffyFrame`] puts the card's frames
//! into a [Taffy](https://github.com/DioxusLabs/taffy) tree so a host can
//! compute positions and sizes with [`compute_frame_layout`].
//!
//! # Example
//!
//! ```ignore
//! use spark_card::layout::{compute_frame_layout, frame_tree, TaffyFrame};
//! use spark_card::primitives::CardView;
//! use spark_card::state::MainContext;
//!
//! let ctx = MainContext::new();
//! let tree = frame_tree();
//! let card = CardView::new(TaffyFrame::new(&tree)?, TaffyFrame::new(&tree)?, &ctx);
//!
//! compute_frame_layout(&card.outer_frame(), 320.0)?;
//! let inner = card.inner_frame().layout()?;
//! ```

mod taffy_bridge;

pub use taffy_bridge::{compute_frame_layout, frame_tree, FrameTree, FrameVisual, TaffyFrame};
