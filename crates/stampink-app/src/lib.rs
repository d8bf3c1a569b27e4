//! StampInk Application
//!
//! The application shell: window lifecycle, softbuffer presentation,
//! file dialogs, and routing of pointer events into the overlay editor.

mod app;

pub use app::{App, AppConfig};
