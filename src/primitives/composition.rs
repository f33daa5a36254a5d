//! Composition - the outer frame wrapping the inner frame.
//!
//! Built once, never rebuilt. Construction writes the defaults through to
//! both frames, locks both borders to transparent, and makes the inner frame
//! the outer frame's only child. After that the only writes are the ones
//! below, each aimed at exactly the frame(s) it names.

use super::frame::Frame;
use crate::state::gesture::ContentRef;
use crate::types::{EdgeInsets, HorizontalAlignment, Rgba, HEIGHT_UNCONSTRAINED};

pub struct Composition<F: Frame> {
    outer: F,
    inner: F,
}

impl<F: Frame> Composition<F> {
    pub fn new(mut outer: F, mut inner: F) -> Self {
        // Inner frame
        inner.set_padding(EdgeInsets::ZERO);
        inner.set_has_shadow(false);
        inner.set_border_color(Rgba::TRANSPARENT);
        inner.set_background(Rgba::TRANSPARENT);
        inner.set_height_request(HEIGHT_UNCONSTRAINED);
        inner.set_horizontal_alignment(HorizontalAlignment::Start);
        inner.set_content(None);

        // Outer frame
        outer.set_padding(EdgeInsets::ZERO);
        outer.set_has_shadow(false);
        outer.set_border_color(Rgba::TRANSPARENT);
        outer.set_height_request(HEIGHT_UNCONSTRAINED);
        outer.set_background(Rgba::TRANSPARENT);
        outer.set_child_frame(&inner);

        Self { outer, inner }
    }

    pub fn outer(&self) -> &F {
        &self.outer
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn set_content(&mut self, content: Option<&ContentRef>) {
        self.inner.set_content(content);
    }

    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        self.inner.set_horizontal_alignment(alignment);
    }

    /// Both frames get the same height in one step, so the inner frame never
    /// outgrows the outer one.
    pub fn set_height_request(&mut self, height: f64) {
        self.outer.set_height_request(height);
        self.inner.set_height_request(height);
    }

    pub fn set_outer_background(&mut self, color: Rgba) {
        self.outer.set_background(color);
    }

    pub fn set_inner_background(&mut self, color: Rgba) {
        self.inner.set_background(color);
    }

    pub fn set_outer_padding(&mut self, padding: EdgeInsets) {
        self.outer.set_padding(padding);
    }

    pub fn set_inner_padding(&mut self, padding: EdgeInsets) {
        self.inner.set_padding(padding);
    }

    pub fn set_has_shadow(&mut self, has_shadow: bool) {
        self.outer.set_has_shadow(has_shadow);
    }
}

// =============================================================================
// Tests
// =============================================================================
