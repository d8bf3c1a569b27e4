//! StampInk Core Library
//!
//! Platform-agnostic overlay geometry and pointer interaction logic.
//! Nothing in here touches pixels or the windowing system.

pub mod editor;
pub mod overlay;

pub use editor::{DragState, OverlayEditor};
pub use overlay::{HANDLE_GRAB_SIZE, HANDLE_SIZE, MIN_OVERLAY_SIZE, OverlayRect};
