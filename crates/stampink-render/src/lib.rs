//! StampInk Render Library
//!
//! CPU compositor producing a packed `0x00RRGGBB` frame from the base
//! image, the overlay bitmap stretched into the overlay rectangle, and the
//! selection chrome. No GPU involved; frames go straight to a softbuffer
//! surface.

mod compositor;

pub use compositor::{Compositor, CompositorError, load_image};
