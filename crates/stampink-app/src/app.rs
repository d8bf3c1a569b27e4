//! Core application state and lifecycle.

use kurbo::{Point, Size};
use softbuffer::{Context, Surface};
use stampink_core::{DragState, OverlayEditor};
use stampink_render::{Compositor, load_image};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::error::EventLoopError;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::Key;
use winit::window::{CursorIcon, Window, WindowId};

/// Background shown before the first base image is opened.
const EMPTY_BACKGROUND: u32 = 0x202020;

/// Application configuration.
pub struct AppConfig {
    /// Window title.
    pub title: String,
    /// Initial window width (until a base image dictates the size).
    pub width: u32,
    /// Initial window height.
    pub height: u32,
    /// Well-known relative path of the fixed overlay bitmap.
    pub overlay_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "StampInk".to_string(),
            width: 800,
            height: 600,
            overlay_path: PathBuf::from("assets/logo.png"),
        }
    }
}

/// Live window state, created in `resumed`.
struct AppState {
    window: Arc<Window>,
    _context: Context<Arc<Window>>,
    surface: Surface<Arc<Window>, Arc<Window>>,
    editor: OverlayEditor,
    compositor: Compositor,
    /// Last pointer position in surface pixels.
    cursor: Point,
}

/// The main application.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create the application with default configuration.
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            state: None,
        }
    }

    /// Run the event loop until the window closes.
    pub fn run() -> Result<(), EventLoopError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);
        let mut app = App::new();
        event_loop.run_app(&mut app)
    }

    /// Show the file dialog and load the picked image as the new base.
    /// Cancelling the dialog changes nothing.
    fn open_base_image(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Open Image")
            .add_filter("Images", &["png", "jpg", "jpeg", "webp"])
            .pick_file();
        if let Some(path) = picked {
            self.load_base_image(&path);
        }
    }

    /// Decode `path` and start a new editing session with it. On decode
    /// failure the previous session is left untouched.
    fn load_base_image(&mut self, path: &Path) {
        let Some(state) = &mut self.state else {
            return;
        };
        match load_image(path) {
            Ok(img) => {
                let (w, h) = (img.width(), img.height());
                state.compositor.set_base_image(img);
                state.editor.load_base_image(Size::new(w as f64, h as f64));
                let _ = state.window.request_inner_size(PhysicalSize::new(w, h));
                state.window.request_redraw();
                log::info!("Loaded base image {} ({}x{})", path.display(), w, h);
            }
            Err(e) => log::error!("{e}"),
        }
    }

    /// Composite the current session and present it. With no base image
    /// loaded the window shows a flat placeholder background instead.
    fn redraw(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };

        let (w, h) = match state.compositor.base_size() {
            Some(size) => size,
            None => {
                let size = state.window.inner_size();
                (size.width, size.height)
            }
        };
        let (Some(nw), Some(nh)) = (NonZeroU32::new(w), NonZeroU32::new(h)) else {
            return;
        };
        if let Err(e) = state.surface.resize(nw, nh) {
            log::error!("Surface resize failed: {e}");
            return;
        }

        let frame = state
            .compositor
            .render(state.editor.rect(), state.editor.is_selected());

        match state.surface.buffer_mut() {
            Ok(mut buffer) => {
                match frame {
                    Some(frame) => buffer.copy_from_slice(frame),
                    None => buffer.fill(EMPTY_BACKGROUND),
                }
                if let Err(e) = buffer.present() {
                    log::error!("Present failed: {e}");
                }
            }
            Err(e) => log::error!("Surface buffer unavailable: {e}"),
        }
    }

    /// Pick the cursor icon for the hovered region when no drag is active.
    fn update_hover_cursor(&self) {
        let Some(state) = &self.state else {
            return;
        };
        if state.editor.canvas_size().is_none()
            || state.editor.drag_state() != DragState::Idle
        {
            return;
        }
        let rect = state.editor.rect();
        let icon = if rect.near_handle(state.cursor) {
            CursorIcon::SeResize
        } else if rect.contains(state.cursor) {
            CursorIcon::Move
        } else {
            CursorIcon::Default
        };
        state.window.set_cursor(icon);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_resizable(false)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("Failed to create window"),
        );

        let context = Context::new(window.clone()).expect("Failed to create context");
        let surface =
            Surface::new(&context, window.clone()).expect("Failed to create surface");

        let mut compositor = Compositor::new();
        match load_image(&self.config.overlay_path) {
            Ok(img) => compositor.set_overlay_image(img),
            Err(e) => log::error!("Overlay asset unavailable, editing without it: {e}"),
        }

        window.request_redraw();
        self.state = Some(AppState {
            window,
            _context: context,
            surface,
            editor: OverlayEditor::new(),
            compositor,
            cursor: Point::ZERO,
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(_) => {
                if let Some(state) = &self.state {
                    state.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let Some(state) = &mut self.state else {
                    return;
                };
                state.cursor = Point::new(position.x, position.y);
                let cursor = state.cursor;
                if state.editor.pointer_move(cursor) {
                    state.window.request_redraw();
                } else {
                    self.update_hover_cursor();
                }
            }

            WindowEvent::CursorLeft { .. } => {
                if let Some(state) = &mut self.state {
                    state.editor.pointer_left();
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(state) = &mut self.state {
                    let cursor = state.cursor;
                    if state.editor.pointer_down(cursor) {
                        state.window.request_redraw();
                    }
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(state) = &mut self.state {
                    state.editor.pointer_up();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let Key::Character(c) = &event.logical_key {
                        if c.as_str() == "o" {
                            self.open_base_image();
                        }
                    }
                }
            }

            WindowEvent::DroppedFile(path) => {
                self.load_base_image(&path);
            }

            _ => {}
        }
    }
}
