//! Windowed viewer: paints a fresh scene at startup, on every click, and on
//! every resize, presenting the frame via softbuffer.

use rand::rngs::ThreadRng;
use std::num::NonZeroU32;
use std::sync::Arc;
use tileblob::Scene;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    surface: Option<softbuffer::Surface<Arc<Window>, Arc<Window>>>,
    scene: Option<Scene>,
    rng: ThreadRng,
    needs_paint: bool,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("tileblob"))
                .expect("failed to create window"),
        );

        let size = window.inner_size();
        let context = softbuffer::Context::new(window.clone()).expect("softbuffer context");
        let mut surface =
            softbuffer::Surface::new(&context, window.clone()).expect("softbuffer surface");
        if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            surface.resize(w, h).expect("softbuffer resize");
        }

        self.scene = Some(Scene::new(size.width, size.height));
        self.surface = Some(surface);
        self.needs_paint = true;
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else { return };
        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let (Some(surface), Some(scene)) = (&mut self.surface, &mut self.scene) {
                    if let (Some(w), Some(h)) =
                        (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                    {
                        surface.resize(w, h).expect("softbuffer resize");
                    }
                    scene.set_viewport(size.width, size.height);
                    self.needs_paint = true;
                    window.request_redraw();
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => {
                self.needs_paint = true;
                window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let Some(scene) = &mut self.scene else { return };

                if self.needs_paint {
                    self.needs_paint = false;
                    match scene.paint(&mut self.rng) {
                        Ok(stats) => info!(
                            layers = stats.layers,
                            shadow_passes = stats.shadow_passes,
                            tile_size = stats.tile_size,
                            occupied_cells = stats.occupied_cells,
                            "painted"
                        ),
                        // keep presenting the previous frame
                        Err(err) => error!(%err, "paint failed"),
                    }
                }

                let (Some(surface), Some(frame)) = (&mut self.surface, scene.frame()) else {
                    return;
                };
                let size = window.inner_size();
                let mut buffer = match surface.buffer_mut() {
                    Ok(buffer) => buffer,
                    Err(err) => {
                        error!(%err, "could not acquire present buffer");
                        return;
                    }
                };

                // The frame carries a tile-sized margin on all sides; the
                // viewport reads from (margin, margin).
                let margin = frame.margin;
                let pixmap = &frame.pixmap;
                let data = pixmap.data();
                let copy_w = size.width.min(pixmap.width().saturating_sub(2 * margin));
                let copy_h = size.height.min(pixmap.height().saturating_sub(2 * margin));
                for y in 0..copy_h {
                    let src_row = ((y + margin) * pixmap.width() + margin) as usize * 4;
                    let dst_row = (y * size.width) as usize;
                    for x in 0..copy_w as usize {
                        let px = &data[src_row + x * 4..src_row + x * 4 + 4];
                        buffer[dst_row + x] =
                            ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32;
                    }
                }

                if let Err(err) = buffer.present() {
                    error!(%err, "present failed");
                }
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().expect("failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::default();
    event_loop.run_app(&mut app).expect("event loop error");
}
