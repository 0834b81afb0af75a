//! Standalone viewer window backed by winit.
//!
//! ```no_run
//! # use scenepick::Viewer;
//! # use scenepick::scene::MeshData;
//! Viewer::builder()
//!     .with_title("Cubes")
//!     .with_object(MeshData::cube(), None, glam::Mat4::IDENTITY)
//!     .build()
//!     .run()
//!     .unwrap();
//! ```
//!
//! Drag with the left button to orbit (or look around in fly mode), scroll
//! while dragging to zoom, `Tab` to switch camera mode. The window title
//! shows the hovered and selected object ids.

use std::sync::Arc;

use glam::Mat4;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, MouseScrollDelta, Touch, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    engine::{FrameScheduler, ViewerEngine},
    error::ViewerError,
    gpu::render_context::RenderContext,
    input::{InputEvent, MouseButton, PointerKind},
    options::Options,
    picking::PickState,
    renderer::WgpuBackend,
    scene::{MeshData, TextureData},
};

// ── Builder ──────────────────────────────────────────────────────────────

/// An object queued for upload once the GPU is available.
struct PendingObject {
    mesh: MeshData,
    texture: Option<TextureData>,
    model: Mat4,
}

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    objects: Vec<PendingObject>,
    options: Options,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            objects: Vec::new(),
            options: Options::default(),
            title: "scenepick".into(),
        }
    }

    /// Add an object to the initial scene. Without a texture it is drawn
    /// with the grey fallback.
    #[must_use]
    pub fn with_object(
        mut self,
        mesh: MeshData,
        texture: Option<TextureData>,
        model: Mat4,
    ) -> Self {
        self.objects.push(PendingObject {
            mesh,
            texture,
            model,
        });
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the base window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            objects: self.objects,
            options: self.options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window showing a pickable scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    objects: Vec<PendingObject>,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop =
            EventLoop::new().map_err(|e| ViewerError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            scheduler: FrameScheduler::new(self.options.render.target_fps),
            cursor: None,
            objects: self.objects,
            options: Some(self.options),
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ViewerError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<ViewerEngine<WgpuBackend>>,
    scheduler: FrameScheduler,
    /// Last cursor position in physical pixels.
    cursor: Option<PhysicalPosition<f64>>,
    objects: Vec<PendingObject>,
    options: Option<Options>,
    title: String,
}

/// Window title with the current pick state.
fn pick_title(base: &str, state: PickState) -> String {
    format!(
        "{base} | hovered {} | selected {}",
        state.hovered, state.selected
    )
}

impl ViewerApp {
    fn create_engine(
        &mut self,
        window: &Arc<Window>,
    ) -> Result<ViewerEngine<WgpuBackend>, ViewerError> {
        let inner = window.inner_size();
        let size = (inner.width.max(1), inner.height.max(1));
        let context =
            pollster::block_on(RenderContext::new(Arc::clone(window), size))?;

        let title = self.title.clone();
        let title_window = Arc::clone(window);
        let sink = move |state: PickState| {
            title_window.set_title(&pick_title(&title, state));
        };

        let options = self.options.take().unwrap_or_default();
        let mut engine = ViewerEngine::with_context(
            context,
            window.scale_factor() as f32,
            options,
            Box::new(sink),
        )?;
        for object in self.objects.drain(..) {
            let _ = engine.add_mesh(
                &object.mesh,
                object.texture.as_ref(),
                object.model,
            );
        }
        log::info!("scene ready: {} objects", engine.scene().len());
        Ok(engine)
    }

    /// Physical → logical pointer event, with the delta since the last
    /// event.
    fn pointer_moved(
        &mut self,
        position: PhysicalPosition<f64>,
        kind: PointerKind,
        scale: f64,
    ) -> InputEvent {
        let (dx, dy) = self.cursor.map_or((0.0, 0.0), |last| {
            (position.x - last.x, position.y - last.y)
        });
        self.cursor = Some(position);
        InputEvent::PointerMoved {
            x: (position.x / scale) as f32,
            y: (position.y / scale) as f32,
            dx: (dx / scale) as f32,
            dy: (dy / scale) as f32,
            kind,
        }
    }

    fn handle_touch(&mut self, touch: Touch, scale: f64) -> Option<InputEvent> {
        match touch.phase {
            TouchPhase::Started => {
                self.cursor = Some(touch.location);
                Some(self.pointer_moved(touch.location, PointerKind::Touch, scale))
            }
            TouchPhase::Moved => {
                Some(self.pointer_moved(touch.location, PointerKind::Touch, scale))
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.cursor = None;
                Some(InputEvent::PointerButton {
                    button: MouseButton::Left,
                    pressed: false,
                })
            }
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(engine)) = (&mut self.window, &mut self.engine)
        else {
            return;
        };
        if let Some(dt) = self.scheduler.tick(window) {
            let _ = engine.tick(dt);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(pick_title(&self.title, PickState::default()))
            .with_inner_size(winit::dpi::LogicalSize::new(1024, 768));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let engine = match self.create_engine(&window) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut pacer = Arc::clone(&window);
        self.scheduler.start(&mut pacer);
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.scheduler.stop();
            event_loop.exit();
            return;
        }

        let Some(scale) = self.window.as_ref().map(|w| w.scale_factor()) else {
            return;
        };

        let input = match event {
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height, scale as f32);
                }
                None
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let inner = self.window.as_ref().map(|w| w.inner_size());
                if let (Some(engine), Some(inner)) = (&mut self.engine, inner) {
                    engine.resize(
                        inner.width,
                        inner.height,
                        scale_factor as f32,
                    );
                }
                None
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
                None
            }

            WindowEvent::CursorMoved { position, .. } => {
                Some(self.pointer_moved(position, PointerKind::Mouse, scale))
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                Some(InputEvent::PointerLeft)
            }

            WindowEvent::MouseInput { button, state, .. } => {
                Some(InputEvent::PointerButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                })
            }

            // Scrolling toward the user zooms out.
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                Some(InputEvent::Wheel { delta: -y })
            }

            WindowEvent::Touch(touch) => self.handle_touch(touch, scale),

            WindowEvent::KeyboardInput { event, .. } => {
                if !event.repeat {
                    if let (PhysicalKey::Code(code), Some(engine)) =
                        (event.physical_key, &mut self.engine)
                    {
                        let key = format!("{code:?}");
                        let _ = engine.handle_key(
                            &key,
                            event.state == ElementState::Pressed,
                        );
                    }
                }
                None
            }

            _ => None,
        };

        if let (Some(input), Some(engine)) = (input, &mut self.engine) {
            let _ = engine.handle_event(input);
        }
    }
}
