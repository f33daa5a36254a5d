//! State Module - gestures and the hand-off to the main context
//!
//! - **Gesture** - pan recognizers, recognizer sets, content nodes
//! - **Dispatch** - the main context and its thread-safe dispatcher
//! - **Swipe** - the swipe-to-clear state machine

pub mod dispatch;
pub mod gesture;
pub mod swipe;

pub use dispatch::{Dispatcher, MainContext, Task, Waker};
pub use gesture::{
    ContentRef, GestureRecognizers, HandlerId, PanGestureRecognizer, PanHandler, PanStatus,
    PanUpdate, View, VisualNode,
};
pub use swipe::{
    clear_threshold, drag_clears_content, SwipeController, SwipeState, DEFAULT_THRESHOLD_RATIO,
    SWIPE_TOUCH_POINTS,
};
