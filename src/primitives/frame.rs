//! Frame - the container capability a card is built from.
//!
//! A frame is a rectangle that can hold one child and be styled with a
//! background, a border color, padding, a height request, and a shadow. The
//! host rendering system supplies the real thing; the card only ever talks
//! to it through [`Frame`].
//!
//! [`MemoryFrame`] is the in-memory implementation. It keeps the last value
//! of every capability and a log of which capability was called, which is
//! what tests and headless hosts want.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::state::gesture::ContentRef;
use crate::types::{EdgeInsets, HorizontalAlignment, Rgba, HEIGHT_UNCONSTRAINED};

// =============================================================================
// Frame Capability
// =============================================================================

/// Capabilities a host container primitive provides.
///
/// Setters are infallible. Values are forwarded as given; the backend
/// decides what a negative height or odd insets mean.
pub trait Frame: 'static {
    fn set_background(&mut self, color: Rgba);

    fn set_border_color(&mut self, color: Rgba);

    fn set_padding(&mut self, padding: EdgeInsets);

    fn set_height_request(&mut self, height: f64);

    fn set_has_shadow(&mut self, has_shadow: bool);

    /// Sizing behavior of this frame's subtree along the horizontal axis.
    fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment);

    /// Host `content` (or nothing) as this frame's child.
    fn set_content(&mut self, content: Option<&ContentRef>);

    /// Host another frame as this frame's child.
    fn set_child_frame(&mut self, child: &Self)
    where
        Self: Sized;
}

// =============================================================================
// Memory Frame
// =============================================================================

/// Identifies a [`MemoryFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(0);

/// A frame's single child.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FrameChild {
    #[default]
    Empty,
    Frame(FrameId),
    Content(ContentRef),
}

/// Last value written through each capability.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub background: Rgba,
    pub border_color: Rgba,
    pub padding: EdgeInsets,
    pub height_request: f64,
    pub has_shadow: bool,
    pub horizontal_alignment: HorizontalAlignment,
    pub child: FrameChild,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            background: Rgba::TRANSPARENT,
            border_color: Rgba::TRANSPARENT,
            padding: EdgeInsets::ZERO,
            height_request: HEIGHT_UNCONSTRAINED,
            has_shadow: false,
            horizontal_alignment: HorizontalAlignment::Start,
            child: FrameChild::Empty,
        }
    }
}

/// Which capability a write went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameWrite {
    Background,
    BorderColor,
    Padding,
    HeightRequest,
    Shadow,
    HorizontalAlignment,
    Content,
    ChildFrame,
}

/// In-memory frame that records every write.
#[derive(Debug)]
pub struct MemoryFrame {
    id: FrameId,
    state: FrameState,
    writes: Vec<FrameWrite>,
}

impl MemoryFrame {
    pub fn new() -> Self {
        Self {
            id: FrameId(NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed)),
            state: FrameState::default(),
            writes: Vec::new(),
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn state(&self) -> &FrameState {
        &self.state
    }

    /// Every write so far, oldest first.
    pub fn writes(&self) -> &[FrameWrite] {
        &self.writes
    }

    /// How many writes went through `kind`.
    pub fn write_count(&self, kind: FrameWrite) -> usize {
        self.writes.iter().filter(|w| **w == kind).count()
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// The hosted content, if the child is content.
    pub fn content(&self) -> Option<&ContentRef> {
        match &self.state.child {
            FrameChild::Content(content) => Some(content),
            _ => None,
        }
    }
}

impl Default for MemoryFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame for MemoryFrame {
    fn set_background(&mut self, color: Rgba) {
        self.state.background = color;
        self.writes.push(FrameWrite::Background);
    }

    fn set_border_color(&mut self, color: Rgba) {
        self.state.border_color = color;
        self.writes.push(FrameWrite::BorderColor);
    }

    fn set_padding(&mut self, padding: EdgeInsets) {
        self.state.padding = padding;
        self.writes.push(FrameWrite::Padding);
    }

    fn set_height_request(&mut self, height: f64) {
        self.state.height_request = height;
        self.writes.push(FrameWrite::HeightRequest);
    }

    fn set_has_shadow(&mut self, has_shadow: bool) {
        self.state.has_shadow = has_shadow;
        self.writes.push(FrameWrite::Shadow);
    }

    fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        self.state.horizontal_alignment = alignment;
        self.writes.push(FrameWrite::HorizontalAlignment);
    }

    fn set_content(&mut self, content: Option<&ContentRef>) {
        self.state.child = match content {
            Some(content) => FrameChild::Content(content.clone()),
            None => FrameChild::Empty,
        };
        self.writes.push(FrameWrite::Content);
    }

    fn set_child_frame(&mut self, child: &Self) {
        self.state.child = FrameChild::Frame(child.id);
        self.writes.push(FrameWrite::ChildFrame);
    }
}

// =============================================================================
// Tests
// =============================================================================
