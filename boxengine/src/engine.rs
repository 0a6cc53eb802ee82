use std::time::{Duration, Instant};

use anyhow::Result;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    ai::{self, RandomSource},
    config::EngineConfig,
    input::{InputCommand, InputHandler},
    message::{MessageArea, MessageBoard},
    render::{Renderer, Surface},
    state::RunState,
    world::{EntityId, World},
};

/// Game hooks called by [`Engine::run`].
///
/// The default `update` and `draw` run the standard box game: player input,
/// enemy turns, gravity, then a full redraw. Override them to add rules on
/// top (scoring, game over) and call the defaults from inside.
pub trait Game {
    /// Called once before the first tick. Set up the world here.
    fn init(&mut self, ctx: &mut EngineContext) -> Result<()>;

    /// Called every tick.
    fn update(&mut self, ctx: &mut EngineContext) -> Result<()> {
        ctx.tick()
    }

    /// Called when the window asks for a redraw.
    fn draw(&mut self, ctx: &mut EngineContext) -> Result<()> {
        ctx.redraw()
    }
}

/// Main entrypoint for running a box game in a window.
///
/// The window receives keyboard input; frames go to the [`Surface`] passed
/// to [`Engine::run`].
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create a new engine instance with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Use a complete configuration (e.g. loaded from a file).
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Override the canvas size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Override the pause between game loop ticks.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the provided game until the window is closed, Escape is pressed or
    /// the game requests exit.
    pub fn run<G: Game + 'static>(self, mut game: G, surface: Box<dyn Surface>) -> Result<()> {
        let config = self.config;
        let tick = config.tick_interval();

        let event_loop = EventLoop::new()?;
        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));
        let window = event_loop.create_window(window_attributes)?;

        let mut ctx = EngineContext::new(config, surface)?;
        game.init(&mut ctx)?;
        log::info!("engine started, ticking every {:?}", tick);

        let mut next_tick = Instant::now() + tick;
        event_loop.run(move |event, elwt| {
            match event {
                Event::NewEvents(StartCause::Init) => {
                    elwt.set_control_flow(ControlFlow::WaitUntil(next_tick));
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        elwt.exit();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if is_escape_pressed(&event) {
                            elwt.exit();
                            return;
                        }
                        if let Err(err) = ctx.handle_key_event(&event) {
                            log::error!("Encountered error during input: {err:?}");
                            elwt.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(err) = game.draw(&mut ctx).and_then(|()| ctx.present()) {
                            log::error!("Encountered error during draw: {err:?}");
                            elwt.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    let now = Instant::now();
                    if now >= next_tick {
                        if let Err(err) = game.update(&mut ctx) {
                            log::error!("Encountered error during update: {err:?}");
                            elwt.exit();
                            return;
                        }
                        next_tick = now + tick;
                        window.request_redraw();
                    }

                    if ctx.exit_requested {
                        elwt.exit();
                        return;
                    }
                    elwt.set_control_flow(ControlFlow::WaitUntil(next_tick));
                }
                Event::LoopExiting => {
                    log::info!("engine stopped after {} frames", ctx.frame_counter());
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn is_escape_pressed(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && matches!(event.physical_key, PhysicalKey::Code(KeyCode::Escape))
}

/// Everything a box game works with: the world, input, pause state, the
/// drawing surface and the message area.
///
/// Hosts without a window can drive it directly: feed keys with
/// [`EngineContext::key_down`] / [`EngineContext::key_up`], call
/// [`EngineContext::tick`] at the tick interval and
/// [`EngineContext::redraw`] whenever a frame is wanted.
pub struct EngineContext {
    config: EngineConfig,
    world: World,
    input: InputHandler,
    run_state: RunState,
    renderer: Renderer,
    surface: Box<dyn Surface>,
    messages: Box<dyn MessageArea>,
    rng: Box<dyn RandomSource>,
    frame_counter: u64,
    exit_requested: bool,
}

impl EngineContext {
    /// Validate `config` and set up an empty world drawing onto `surface`.
    pub fn new(config: EngineConfig, surface: Box<dyn Surface>) -> Result<Self> {
        config.validate()?;
        let mut world = World::new();
        world.set_gravity(config.gravity)?;
        world.set_roam_contact(config.roam_contact);
        let renderer = Renderer::new(config.palette.clone(), config.menu_font.clone());

        Ok(Self {
            config,
            world,
            input: InputHandler::new(),
            run_state: RunState::Running,
            renderer,
            surface,
            messages: Box::new(MessageBoard::new()),
            rng: Box::new(fastrand::Rng::new()),
            frame_counter: 0,
            exit_requested: false,
        })
    }

    /// Replace the message area.
    #[must_use]
    pub fn with_messages(mut self, messages: Box<dyn MessageArea>) -> Self {
        self.messages = messages;
        self
    }

    /// Replace the random source used by enemy AI.
    #[must_use]
    pub fn with_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Swap in a new world (e.g. one built from a level layout).
    pub fn set_world(&mut self, world: World) {
        self.world = world;
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_paused(&self) -> bool {
        self.run_state.is_paused()
    }

    /// Number of ticks that ran while not paused.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Ask the engine to stop after the current callback.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Place borders around the surface using the configured size, solidity
    /// and border colour.
    pub fn place_borders(&mut self) -> Result<[EntityId; 4]> {
        let size = self.surface.size();
        Ok(self.world.place_borders(
            self.config.border_size,
            self.config.solid_borders,
            size,
            self.config.palette.border,
        )?)
    }

    pub fn msg_print(&mut self, message: &str) {
        self.messages.print(message);
    }

    pub fn msg_clear(&mut self) {
        self.messages.clear();
    }

    fn dispatch(&mut self, command: Option<InputCommand>) -> Result<()> {
        if let Some(InputCommand::TogglePause) = command {
            self.switch_paused()?;
        }
        Ok(())
    }

    /// A key went down. Arrow keys set the held direction, space toggles
    /// pause.
    pub fn key_down(&mut self, key: KeyCode, repeat: bool) -> Result<()> {
        let command = self.input.press(key, repeat);
        self.dispatch(command)
    }

    /// A key identified by a legacy numeric code went down.
    pub fn key_down_legacy(&mut self, code: u32) -> Result<()> {
        let command = self.input.press_legacy(code);
        self.dispatch(command)
    }

    /// Any key went up.
    pub fn key_up(&mut self) {
        self.input.release();
    }

    /// Handle a keyboard input event from winit.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Result<()> {
        let command = self.input.handle_key(event);
        self.dispatch(command)
    }

    /// Flip between running and paused.
    ///
    /// Pausing draws the pause menu over the current frame. Resuming clears
    /// the message area and redraws the whole game.
    pub fn switch_paused(&mut self) -> Result<()> {
        self.run_state = self.run_state.toggled();
        match self.run_state {
            RunState::Paused => {
                log::info!("paused at frame {}", self.frame_counter);
                self.renderer.draw_pause_menu(self.surface.as_mut());
            }
            RunState::Running => {
                log::info!("resumed at frame {}", self.frame_counter);
                self.messages.clear();
                self.renderer
                    .draw_game(self.surface.as_mut(), &self.world)?;
            }
        }
        Ok(())
    }

    /// Advance the game by one step: player movement from the held key,
    /// enemy turns, then gravity. Does nothing while paused.
    pub fn tick(&mut self) -> Result<()> {
        if self.run_state.is_paused() {
            return Ok(());
        }
        self.frame_counter += 1;

        if let Some(player) = self.world.player_id() {
            self.input.handle_default_movement(&mut self.world, player)?;
        }
        ai::take_turns(&mut self.world, self.rng.as_mut())?;
        self.world.apply_all_gravity()?;
        Ok(())
    }

    /// Draw the game frame. While paused the pause menu stays on screen.
    pub fn redraw(&mut self) -> Result<()> {
        if self.run_state.is_paused() {
            return Ok(());
        }
        self.renderer
            .draw_game(self.surface.as_mut(), &self.world)?;
        Ok(())
    }

    pub fn draw_intro(&mut self) {
        self.renderer.draw_intro(self.surface.as_mut());
    }

    /// Hand the current frame to the host.
    pub fn present(&mut self) -> Result<()> {
        self.surface.present()
    }
}
