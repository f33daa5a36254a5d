//! Taffy Bridge - frames backed by a Taffy layout tree.
//!
//! Each [`TaffyFrame`] is one node in a shared `TaffyTree`. Layout-relevant
//! capabilities (padding, height, alignment, the child frame) go into the
//! node's `Style` and children. Purely visual ones (background, border,
//! shadow, hosted content) go into the node context, a [`FrameVisual`].
//!
//! Frames are column flex containers. Horizontal alignment is the frame's
//! own `align_self`, so it takes effect inside the outer frame.

use std::cell::RefCell;
use std::rc::Rc;

use taffy::{
    AlignSelf, AvailableSpace, Dimension, Display, FlexDirection, Layout, LengthPercentage,
    NodeId, Rect, Size, Style, TaffyTree,
};
use tracing::warn;

use crate::error::Result;
use crate::primitives::Frame;
use crate::state::gesture::ContentRef;
use crate::types::{EdgeInsets, HorizontalAlignment, Rgba};

// =============================================================================
// CONVERSIONS
// =============================================================================

/// Negative (and NaN) heights are unconstrained.
fn to_taffy_height(height: f64) -> Dimension {
    if height >= 0.0 {
        Dimension::Length(height as f32)
    } else {
        Dimension::Auto
    }
}

fn to_taffy_padding(padding: EdgeInsets) -> Rect<LengthPercentage> {
    Rect {
        top: LengthPercentage::Length(padding.top as f32),
        right: LengthPercentage::Length(padding.right as f32),
        bottom: LengthPercentage::Length(padding.bottom as f32),
        left: LengthPercentage::Length(padding.left as f32),
    }
}

fn to_taffy_align_self(alignment: HorizontalAlignment) -> AlignSelf {
    match alignment {
        HorizontalAlignment::Start => AlignSelf::FlexStart,
        HorizontalAlignment::Center => AlignSelf::Center,
        HorizontalAlignment::End => AlignSelf::FlexEnd,
        HorizontalAlignment::Fill => AlignSelf::Stretch,
    }
}

fn frame_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        ..Style::default()
    }
}

// =============================================================================
// TREE
// =============================================================================

/// Visual state kept in each node's context.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameVisual {
    pub background: Rgba,
    pub border_color: Rgba,
    pub has_shadow: bool,
    pub content: Option<ContentRef>,
}

impl Default for FrameVisual {
    fn default() -> Self {
        Self {
            background: Rgba::TRANSPARENT,
            border_color: Rgba::TRANSPARENT,
            has_shadow: false,
            content: None,
        }
    }
}

/// Layout tree shared by the frames of one or more cards.
pub type FrameTree = Rc<RefCell<TaffyTree<FrameVisual>>>;

pub fn frame_tree() -> FrameTree {
    Rc::new(RefCell::new(TaffyTree::new()))
}

// =============================================================================
// FRAME
// =============================================================================

pub struct TaffyFrame {
    tree: FrameTree,
    node: NodeId,
}

impl TaffyFrame {
    /// Add a fresh leaf to `tree`.
    pub fn new(tree: &FrameTree) -> Result<Self> {
        let node = tree
            .borrow_mut()
            .new_leaf_with_context(frame_style(), FrameVisual::default())?;

        Ok(Self { tree: tree.clone(), node })
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn tree(&self) -> &FrameTree {
        &self.tree
    }

    /// Copy of the node's visual state.
    pub fn visual(&self) -> Option<FrameVisual> {
        self.tree.borrow().get_node_context(self.node).cloned()
    }

    /// Copy of the node's style.
    pub fn style(&self) -> Result<Style> {
        Ok(self.tree.borrow().style(self.node)?.clone())
    }

    /// Result of the last [`compute_frame_layout`] that covered this frame.
    pub fn layout(&self) -> Result<Layout> {
        Ok(*self.tree.borrow().layout(self.node)?)
    }

    fn update_style(&self, update: impl FnOnce(&mut Style)) {
        let mut tree = self.tree.borrow_mut();
        let result = tree.style(self.node).cloned().and_then(|mut style| {
            update(&mut style);
            tree.set_style(self.node, style)
        });
        if let Err(err) = result {
            warn!(node = ?self.node, %err, "frame style update failed");
        }
    }

    fn update_visual(&self, update: impl FnOnce(&mut FrameVisual)) {
        match self.tree.borrow_mut().get_node_context_mut(self.node) {
            Some(visual) => update(visual),
            None => warn!(node = ?self.node, "frame has no visual context"),
        }
    }

    fn replace_children(&self, children: &[NodeId]) {
        if let Err(err) = self.tree.borrow_mut().set_children(self.node, children) {
            warn!(node = ?self.node, %err, "frame child update failed");
        }
    }
}

impl Frame for TaffyFrame {
    fn set_background(&mut self, color: Rgba) {
        self.update_visual(|visual| visual.background = color);
    }

    fn set_border_color(&mut self, color: Rgba) {
        self.update_visual(|visual| visual.border_color = color);
    }

    fn set_padding(&mut self, padding: EdgeInsets) {
        self.update_style(|style| style.padding = to_taffy_padding(padding));
    }

    fn set_height_request(&mut self, height: f64) {
        self.update_style(|style| style.size.height = to_taffy_height(height));
    }

    fn set_has_shadow(&mut self, has_shadow: bool) {
        self.update_visual(|visual| visual.has_shadow = has_shadow);
    }

    fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        self.update_style(|style| style.align_self = Some(to_taffy_align_self(alignment)));
    }

    fn set_content(&mut self, content: Option<&ContentRef>) {
        self.replace_children(&[]);
        self.update_visual(|visual| visual.content = content.cloned());
    }

    fn set_child_frame(&mut self, child: &Self) {
        if !Rc::ptr_eq(&self.tree, &child.tree) {
            warn!(node = ?self.node, child = ?child.node, "child frame lives in another tree");
            return;
        }
        self.update_visual(|visual| visual.content = None);
        self.replace_children(&[child.node]);
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Lay out `frame` and its subtree within `available_width`. Height is
/// unconstrained.
///
/// A frame hosting content measures as wide as the content.
pub fn compute_frame_layout(frame: &TaffyFrame, available_width: f64) -> Result<()> {
    let available = Size {
        width: AvailableSpace::Definite(available_width as f32),
        height: AvailableSpace::MaxContent,
    };

    let measure = |known_dimensions: Size<Option<f32>>,
                   _available_space: Size<AvailableSpace>,
                   _node_id: NodeId,
                   context: Option<&mut FrameVisual>,
                   _style: &Style| {
        let content_width = context
            .and_then(|visual| visual.content.as_ref())
            .map_or(0.0, |content| content.width() as f32);

        Size {
            width: known_dimensions.width.unwrap_or(content_width),
            height: known_dimensions.height.unwrap_or(0.0),
        }
    };

    frame
        .tree
        .borrow_mut()
        .compute_layout_with_measure(frame.node, available, measure)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::CardView;
    use crate::state::dispatch::MainContext;
    use crate::state::gesture::View;

    fn taffy_card(ctx: &MainContext) -> (FrameTree, CardView<TaffyFrame>) {
        let tree = frame_tree();
        let outer = TaffyFrame::new(&tree).unwrap();
        let inner = TaffyFrame::new(&tree).unwrap();
        (tree, CardView::new(outer, inner, ctx))
    }

    #[test]
    fn test_height_conversion() {
        assert_eq!(to_taffy_height(-1.0), Dimension::Auto);
        assert_eq!(to_taffy_height(f64::NAN), Dimension::Auto);
        assert_eq!(to_taffy_height(0.0), Dimension::Length(0.0));
        assert_eq!(to_taffy_height(32.0), Dimension::Length(32.0));
    }

    #[test]
    fn test_inner_is_only_child() {
        let ctx = MainContext::new();
        let (tree, card) = taffy_card(&ctx);

        let outer = card.outer_frame().node_id();
        let inner = card.inner_frame().node_id();
        assert_eq!(tree.borrow().children(outer).unwrap(), vec![inner]);
        assert!(tree.borrow().children(inner).unwrap().is_empty());
    }

    #[test]
    fn test_height_and_padding_reach_styles() {
        let ctx = MainContext::new();
        let (_tree, card) = taffy_card(&ctx);

        card.set_height_request(72.0);
        card.set_outer_padding(EdgeInsets::uniform(5.0));

        let outer = card.outer_frame().style().unwrap();
        let inner = card.inner_frame().style().unwrap();
        assert_eq!(outer.size.height, Dimension::Length(72.0));
        assert_eq!(inner.size.height, Dimension::Length(72.0));
        assert_eq!(outer.padding.left, LengthPercentage::Length(5.0));
        assert_eq!(inner.padding.left, LengthPercentage::Length(0.0));

        card.set_height_request(-1.0);
        assert_eq!(card.outer_frame().style().unwrap().size.height, Dimension::Auto);
        assert_eq!(card.inner_frame().style().unwrap().size.height, Dimension::Auto);
    }

    #[test]
    fn test_visuals_in_context() {
        let ctx = MainContext::new();
        let (_tree, card) = taffy_card(&ctx);
        let content = ContentRef::new(View::new("c", 40.0));

        card.set_has_shadow(true);
        card.set_inner_fill_color(Rgba::GREEN);
        card.set_content(Some(content.clone()));

        let outer = card.outer_frame().visual().unwrap();
        let inner = card.inner_frame().visual().unwrap();
        assert!(outer.has_shadow);
        assert!(!inner.has_shadow);
        assert_eq!(inner.background, Rgba::GREEN);
        assert_eq!(inner.content, Some(content));
        assert!(outer.border_color.is_transparent());
        assert!(inner.border_color.is_transparent());
    }

    #[test]
    fn test_layout_offsets_inner_by_outer_padding() {
        let ctx = MainContext::new();
        let (_tree, card) = taffy_card(&ctx);
        card.set_outer_padding(EdgeInsets::new(4.0, 10.0, 4.0, 10.0));
        card.set_content(Some(ContentRef::new(View::new("c", 100.0))));

        compute_frame_layout(&card.outer_frame(), 200.0).unwrap();

        let inner = card.inner_frame().layout().unwrap();
        assert_eq!(inner.location.x, 10.0);
        assert_eq!(inner.location.y, 4.0);
        assert_eq!(inner.size.width, 100.0);
    }

    #[test]
    fn test_fill_stretches_inner() {
        let ctx = MainContext::new();
        let (_tree, card) = taffy_card(&ctx);
        card.set_outer_padding(EdgeInsets::symmetric(10.0, 0.0));
        card.set_content(Some(ContentRef::new(View::new("c", 100.0))));
        card.set_horizontal_alignment(HorizontalAlignment::Fill);

        compute_frame_layout(&card.outer_frame(), 200.0).unwrap();

        let outer = card.outer_frame().layout().unwrap();
        let inner = card.inner_frame().layout().unwrap();
        assert!(outer.size.width >= 120.0);
        assert_eq!(inner.size.width, outer.size.width - 20.0);
    }
}
