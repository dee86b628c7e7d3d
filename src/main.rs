use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use clap::Parser;
use glam::Vec2;
use log::{debug, error, info};
use rand::{SeedableRng, rngs::StdRng};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use flatland::config::{Args, Config};
use flatland::renderer::{self, Layout, Overview};
use flatland::{Camera, Color, World};

struct App {
    config: Config,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    world: World,
    camera: Camera,
    columns: Vec<Color>,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Input and movement
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
}

impl App {
    fn new(config: Config) -> anyhow::Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let world = World::random(&mut rng, config.objects, config.spawn_extent);
        info!("generated {} objects from seed {seed}", world.len());

        let camera = Camera::new(
            Vec2::ZERO,
            Vec2::Y, // facing along +Y axis
            config.width.max(1) as usize,
            config.viewport_distance,
            config.viewport_size,
        )
        .context("invalid camera configuration")?;
        info!(
            "field of view {:.1} degrees, view distance {}",
            camera.fov().to_degrees(),
            config.render.max_view_distance
        );

        Ok(Self {
            config,
            window: None,
            surface: None,
            world,
            camera,
            columns: Vec::new(),

            frame_counter: 0,
            last_fps_print: Instant::now(),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
        })
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title("Flatland")
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Rc::new(event_loop.create_window(attributes).context("create window")?);

        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("softbuffer surface: {e}"))?;

        self.camera.set_pixel_count(window.inner_size().width as usize);
        window.request_redraw();

        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
        Ok(())
    }

    fn tick(&mut self) {
        // Compute dt with cap to avoid huge jumps if the app was paused
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;
        let dt_s = dt.as_secs_f32();

        let pressed = |code: KeyCode| self.keys_down.contains(&code);
        let axis = |pos: KeyCode, neg: KeyCode| (pressed(pos) as i32 - pressed(neg) as i32) as f32;

        let fwd = axis(KeyCode::KeyW, KeyCode::KeyS);
        let strafe = axis(KeyCode::KeyD, KeyCode::KeyA);
        // Q turns left (counter-clockwise), E turns right; D strafes right
        let turn = axis(KeyCode::KeyQ, KeyCode::KeyE);

        if turn != 0.0 {
            self.camera.rotate(turn * self.config.turn_speed * dt_s);
        }
        if fwd != 0.0 || strafe != 0.0 {
            let step = self.config.move_speed * dt_s;
            self.camera.move_forward(fwd * step);
            self.camera.strafe(strafe * step);
            self.camera.clamp_to(self.config.world_size);
        }
    }

    fn redraw(&mut self, id: WindowId) -> anyhow::Result<()> {
        self.tick();

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };

        surface
            .resize(w, h)
            .map_err(|e| anyhow!("resize surface: {e}"))?;

        self.camera.set_pixel_count(w.get() as usize);
        self.columns.resize(self.camera.pixel_count(), self.config.render.background);
        self.camera
            .cast_rays_into(&self.world, &self.config.render, &mut self.columns);

        let layout = Layout::new(w.get() as usize, h.get() as usize);
        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow!("buffer_mut: {e}"))?;
        renderer::render_frame(
            &mut buf,
            layout,
            &self.world,
            &self.camera,
            &self.columns,
            self.config.render.background,
            Overview {
                scale: self.config.overview_scale,
                view_distance: self.config.render.max_view_distance,
            },
        );
        buf.present().map_err(|e| anyhow!("present: {e}"))?;

        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            let pos = self.camera.pos;
            debug!(
                "FPS: {:.1}, pos: x={:.3}, y={:.3}",
                self.frame_counter as f32 / elapsed,
                pos.x,
                pos.y
            );
            self.frame_counter = 0;
            self.last_fps_print = now;
        }

        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.init_window(event_loop) {
            error!("{e:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("The close button was pressed; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed if code == KeyCode::Escape => {
                    info!("Escape pressed; stopping");
                    event_loop.exit();
                }
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw(id) {
                    error!("{e:#}");
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                debug!("resized to {}x{}", new_size.width, new_size.height);
                self.camera.set_pixel_count(new_size.width as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let config = Config::from(&args);
    info!("starting with {config:?}");

    let event_loop = EventLoop::new().context("create event loop")?;
    // Redraws are requested every frame, so waiting still renders continuously
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config)?;
    event_loop.run_app(&mut app).context("event loop")?;
    Ok(())
}
