//! Property Store - the nine card attributes.
//!
//! Attributes are public fields, the same way layout properties sit on a
//! node as individual slots. Every field is keyed by an [`AttrKind`], so the
//! store can also be driven by name through [`AttrValue`].

use std::rc::Rc;

use super::property::{Attribute, ChangeObservers, Mutator};
use crate::state::gesture::ContentRef;
use crate::types::{AttrKind, EdgeInsets, HorizontalAlignment, Rgba, HEIGHT_UNCONSTRAINED};

// =============================================================================
// Attribute Values
// =============================================================================

/// One attribute's value, tagged with its key.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Content(Option<ContentRef>),
    HorizontalAlignment(HorizontalAlignment),
    HeightRequest(f64),
    OuterFillColor(Rgba),
    InnerFillColor(Rgba),
    OuterPadding(EdgeInsets),
    InnerPadding(EdgeInsets),
    HasShadow(bool),
    SwipeToClearEnabled(bool),
}

impl AttrValue {
    pub fn kind(&self) -> AttrKind {
        match self {
            AttrValue::Content(_) => AttrKind::Content,
            AttrValue::HorizontalAlignment(_) => AttrKind::HorizontalAlignment,
            AttrValue::HeightRequest(_) => AttrKind::HeightRequest,
            AttrValue::OuterFillColor(_) => AttrKind::OuterFillColor,
            AttrValue::InnerFillColor(_) => AttrKind::InnerFillColor,
            AttrValue::OuterPadding(_) => AttrKind::OuterPadding,
            AttrValue::InnerPadding(_) => AttrKind::InnerPadding,
            AttrValue::HasShadow(_) => AttrKind::HasShadow,
            AttrValue::SwipeToClearEnabled(_) => AttrKind::SwipeToClearEnabled,
        }
    }

    /// The default value for `kind`.
    pub fn default_for(kind: AttrKind) -> Self {
        match kind {
            AttrKind::Content => AttrValue::Content(None),
            AttrKind::HorizontalAlignment => {
                AttrValue::HorizontalAlignment(HorizontalAlignment::Start)
            }
            AttrKind::HeightRequest => AttrValue::HeightRequest(HEIGHT_UNCONSTRAINED),
            AttrKind::OuterFillColor => AttrValue::OuterFillColor(Rgba::TRANSPARENT),
            AttrKind::InnerFillColor => AttrValue::InnerFillColor(Rgba::TRANSPARENT),
            AttrKind::OuterPadding => AttrValue::OuterPadding(EdgeInsets::ZERO),
            AttrKind::InnerPadding => AttrValue::InnerPadding(EdgeInsets::ZERO),
            AttrKind::HasShadow => AttrValue::HasShadow(false),
            AttrKind::SwipeToClearEnabled => AttrValue::SwipeToClearEnabled(false),
        }
    }
}

// =============================================================================
// Mutators
// =============================================================================

/// One mutator per attribute, handed to [`PropertyStore::new`].
pub struct StoreMutators {
    pub content: Mutator<Option<ContentRef>>,
    pub horizontal_alignment: Mutator<HorizontalAlignment>,
    pub height_request: Mutator<f64>,
    pub outer_fill_color: Mutator<Rgba>,
    pub inner_fill_color: Mutator<Rgba>,
    pub outer_padding: Mutator<EdgeInsets>,
    pub inner_padding: Mutator<EdgeInsets>,
    pub has_shadow: Mutator<bool>,
    pub swipe_to_clear_enabled: Mutator<bool>,
}

impl StoreMutators {
    /// Mutators that do nothing. Handy for a store without a visual side.
    pub fn noop() -> Self {
        Self {
            content: Box::new(|_| {}),
            horizontal_alignment: Box::new(|_| {}),
            height_request: Box::new(|_| {}),
            outer_fill_color: Box::new(|_| {}),
            inner_fill_color: Box::new(|_| {}),
            outer_padding: Box::new(|_| {}),
            inner_padding: Box::new(|_| {}),
            has_shadow: Box::new(|_| {}),
            swipe_to_clear_enabled: Box::new(|_| {}),
        }
    }
}

// =============================================================================
// Property Store
// =============================================================================

pub struct PropertyStore {
    pub content: Attribute<Option<ContentRef>>,
    pub horizontal_alignment: Attribute<HorizontalAlignment>,
    pub height_request: Attribute<f64>,
    pub outer_fill_color: Attribute<Rgba>,
    pub inner_fill_color: Attribute<Rgba>,
    pub outer_padding: Attribute<EdgeInsets>,
    pub inner_padding: Attribute<EdgeInsets>,
    pub has_shadow: Attribute<bool>,
    pub swipe_to_clear_enabled: Attribute<bool>,
    observers: Rc<ChangeObservers>,
}

impl PropertyStore {
    /// Create a store holding the defaults. Mutators do not run here.
    pub fn new(mutators: StoreMutators) -> Self {
        let observers = ChangeObservers::new();

        let StoreMutators {
            content,
            horizontal_alignment,
            height_request,
            outer_fill_color,
            inner_fill_color,
            outer_padding,
            inner_padding,
            has_shadow,
            swipe_to_clear_enabled,
        } = mutators;

        macro_rules! attribute {
            ($kind:expr, $default:expr, $mutator:expr) => {
                Attribute::new($kind, $default, $mutator, observers.clone())
            };
        }

        Self {
            content: attribute!(AttrKind::Content, None, content),
            horizontal_alignment: attribute!(
                AttrKind::HorizontalAlignment,
                HorizontalAlignment::Start,
                horizontal_alignment
            ),
            height_request: attribute!(AttrKind::HeightRequest, HEIGHT_UNCONSTRAINED, height_request),
            outer_fill_color: attribute!(AttrKind::OuterFillColor, Rgba::TRANSPARENT, outer_fill_color),
            inner_fill_color: attribute!(AttrKind::InnerFillColor, Rgba::TRANSPARENT, inner_fill_color),
            outer_padding: attribute!(AttrKind::OuterPadding, EdgeInsets::ZERO, outer_padding),
            inner_padding: attribute!(AttrKind::InnerPadding, EdgeInsets::ZERO, inner_padding),
            has_shadow: attribute!(AttrKind::HasShadow, false, has_shadow),
            swipe_to_clear_enabled: attribute!(
                AttrKind::SwipeToClearEnabled,
                false,
                swipe_to_clear_enabled
            ),
            observers,
        }
    }

    /// Observers shared by every attribute of this store.
    pub fn observers(&self) -> &Rc<ChangeObservers> {
        &self.observers
    }

    /// Read an attribute by key.
    pub fn get(&self, kind: AttrKind) -> AttrValue {
        match kind {
            AttrKind::Content => AttrValue::Content(self.content.get()),
            AttrKind::HorizontalAlignment => {
                AttrValue::HorizontalAlignment(self.horizontal_alignment.get())
            }
            AttrKind::HeightRequest => AttrValue::HeightRequest(self.height_request.get()),
            AttrKind::OuterFillColor => AttrValue::OuterFillColor(self.outer_fill_color.get()),
            AttrKind::InnerFillColor => AttrValue::InnerFillColor(self.inner_fill_color.get()),
            AttrKind::OuterPadding => AttrValue::OuterPadding(self.outer_padding.get()),
            AttrKind::InnerPadding => AttrValue::InnerPadding(self.inner_padding.get()),
            AttrKind::HasShadow => AttrValue::HasShadow(self.has_shadow.get()),
            AttrKind::SwipeToClearEnabled => {
                AttrValue::SwipeToClearEnabled(self.swipe_to_clear_enabled.get())
            }
        }
    }

    /// Write an attribute by key. Returns `true` if the mutator ran.
    pub fn set(&self, value: AttrValue) -> bool {
        match value {
            AttrValue::Content(v) => self.content.set(v),
            AttrValue::HorizontalAlignment(v) => self.horizontal_alignment.set(v),
            AttrValue::HeightRequest(v) => self.height_request.set(v),
            AttrValue::OuterFillColor(v) => self.outer_fill_color.set(v),
            AttrValue::InnerFillColor(v) => self.inner_fill_color.set(v),
            AttrValue::OuterPadding(v) => self.outer_padding.set(v),
            AttrValue::InnerPadding(v) => self.inner_padding.set(v),
            AttrValue::HasShadow(v) => self.has_shadow.set(v),
            AttrValue::SwipeToClearEnabled(v) => self.swipe_to_clear_enabled.set(v),
        }
    }

    /// Every attribute's current value, in [`AttrKind::ALL`] order.
    pub fn snapshot(&self) -> Vec<AttrValue> {
        AttrKind::ALL.into_iter().map(|kind| self.get(kind)).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
