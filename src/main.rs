use anyhow::Result;
use glam::Vec2;
use log::{error, info, warn};
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

mod config;
mod core;
mod demo;
mod engine;

use config::AppConfig;
use demo::{Demo, DEMOS};
use engine::game_loop::GameLoop;
use engine::input::{Action, InputManager};
use engine::physics::{point, vector, CollisionGroups, RigidBodyHandle};
use engine::renderer::Renderer;

/// Fraction of the distance to the cursor a grabbed body covers per tick
const GRAB_STIFFNESS: f32 = 0.5;

/// Running demo plus everything the host needs to drive it
struct App {
    config: AppConfig,
    window: Arc<Window>,
    renderer: Renderer,
    game_loop: GameLoop,
    input: InputManager,
    current: usize,
    demo: Option<Box<dyn Demo>>,
    grabbed: Option<RigidBodyHandle>,
}

impl App {
    /// Tear down the running demo and start demo `index`
    fn switch_to(&mut self, index: usize) {
        if let Some(old) = self.demo.take() {
            info!("Destroying demo: {}", old.name());
            old.destroy();
        }
        self.grabbed = None;

        let entry = &DEMOS[index];
        match (entry.init)(&self.config) {
            Ok(demo) => {
                info!("Starting demo: {}", entry.name);
                self.current = index;
                self.demo = Some(demo);
                self.update_title();
            }
            Err(e) => error!("Failed to start demo {}: {}", entry.name, e),
        }
    }

    fn update_title(&self) {
        let mut title = format!("{} - {}", self.config.window.title, DEMOS[self.current].name);
        if self.game_loop.is_paused() {
            title.push_str(" (paused)");
        }
        self.window.set_title(&title);
    }

    /// Apply the one-shot commands pressed since the last frame
    ///
    /// Returns `false` when the host should quit.
    fn handle_commands(&mut self) -> bool {
        for action in self.input.drain_triggered() {
            match action {
                Action::NextDemo => self.switch_to((self.current + 1) % DEMOS.len()),
                Action::SelectDemo(index) if index < DEMOS.len() => self.switch_to(index),
                Action::Reset => self.switch_to(self.current),
                Action::Pause => {
                    self.game_loop.toggle_pause();
                    self.update_title();
                }
                Action::ToggleContacts => {
                    let shown = self.renderer.debug_renderer_mut().toggle_contacts();
                    info!("Contact markers {}", if shown { "on" } else { "off" });
                }
                Action::Quit => return false,
                _ => {}
            }
        }
        true
    }

    /// Drag the body under the cursor while the grab button is held
    fn drive_grab(&mut self) {
        let Some(demo) = self.demo.as_mut() else {
            return;
        };

        if !self.input.is_pressed(Action::Grab) {
            self.grabbed = None;
            return;
        }

        let target = self.renderer.camera().screen_to_world(self.input.cursor());
        let target = point![target.x, target.y];

        if self.grabbed.is_none() {
            self.grabbed = demo
                .world()
                .body_at_point(target, CollisionGroups::grab_query());
        }

        let Some(handle) = self.grabbed else {
            return;
        };
        let tick_secs = self.game_loop.tick_secs();
        match demo.world_mut().get_rigid_body_mut(handle) {
            Some(body) => {
                let offset = target.coords - body.translation();
                body.set_linvel(offset * (GRAB_STIFFNESS / tick_secs), true);
            }
            None => self.grabbed = None,
        }
    }

    /// Run the ticks owed for this frame, then draw
    fn frame(&mut self) {
        let ticks = self.game_loop.begin_frame();
        for _ in 0..ticks {
            self.drive_grab();

            let keyboard = self.input.keyboard_vector();
            let tick = self.game_loop.next_tick();
            if let Some(demo) = self.demo.as_mut() {
                if let Err(e) = demo.update(tick, vector![keyboard.x, keyboard.y]) {
                    error!("{} update failed: {}", demo.name(), e);
                }
            }
        }

        if let Some(demo) = self.demo.as_ref() {
            if let Err(e) = demo.draw(&mut self.renderer) {
                error!("Render error: {}", e);
            }
        }
    }
}

fn main() -> Result<()> {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // RUST_LOG, when set, wins over the configured level
    env_logger::Builder::new()
        .filter_level(config.debug.level_filter())
        .parse_default_env()
        .init();

    if let Some(e) = config_error {
        warn!("{}, using defaults", e);
    }

    info!("Starting {}...", config.window.title);

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let bounds = config.physics.bounds;
    let renderer = pollster::block_on(Renderer::new(
        window.clone(),
        Vec2::new(bounds[0], bounds[1]),
        config.debug.show_contacts,
    ))?;

    let start = demo::find(&config.demo.start).unwrap_or_else(|| {
        warn!("Unknown demo '{}', starting the first one", config.demo.start);
        0
    });

    let mut app = App {
        game_loop: GameLoop::new(config.physics.tick_rate),
        input: InputManager::new(),
        config,
        window: window.clone(),
        renderer,
        current: start,
        demo: None,
        grabbed: None,
    };
    app.switch_to(start);

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    app.renderer.resize(physical_size);
                }
                WindowEvent::Focused(false) => {
                    app.input.reset();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    app.input.process_keyboard_event(&event);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    app.input.process_mouse_button(button, state);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    app.input
                        .set_cursor(Vec2::new(position.x as f32, position.y as f32));
                }
                WindowEvent::RedrawRequested => {
                    if !app.handle_commands() {
                        info!(
                            "Quit requested after {} ticks, shutting down...",
                            app.game_loop.ticks()
                        );
                        elwt.exit();
                        return;
                    }
                    app.frame();
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                if let Some(demo) = app.demo.take() {
                    demo.destroy();
                }
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
