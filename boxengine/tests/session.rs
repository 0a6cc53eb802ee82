use std::cell::RefCell;
use std::rc::Rc;

use boxengine::render::PAUSE_TEXT;
use boxengine::{
    Behaviour, Color, ContactPolicy, DrawCommand, DrawList, EngineConfig, EngineContext, Entity,
    KeyCode, LevelLayout, MessageArea, Movable, RandomSource, Rect, Surface, Vec2,
};

/// Surface handle the test keeps a second reference to.
#[derive(Clone)]
struct SharedSurface(Rc<RefCell<DrawList>>);

impl SharedSurface {
    fn new(width: f32, height: f32) -> Self {
        Self(Rc::new(RefCell::new(DrawList::new(width, height))))
    }

    fn take(&self) -> Vec<DrawCommand> {
        self.0.borrow_mut().take()
    }
}

impl Surface for SharedSurface {
    fn size(&self) -> (f32, f32) {
        self.0.borrow().size()
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.0.borrow_mut().clear_rect(rect);
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.0.borrow_mut().fill_rect(rect);
    }

    fn fill_text(&mut self, text: &str, position: Vec2) {
        self.0.borrow_mut().fill_text(text, position);
    }

    fn set_fill_style(&mut self, color: Color) {
        self.0.borrow_mut().set_fill_style(color);
    }

    fn set_font(&mut self, font: &boxengine::Font) {
        self.0.borrow_mut().set_font(font);
    }
}

#[derive(Clone, Default)]
struct SharedMessages(Rc<RefCell<Option<String>>>);

impl MessageArea for SharedMessages {
    fn print(&mut self, message: &str) {
        *self.0.borrow_mut() = Some(message.to_string());
    }

    fn clear(&mut self) {
        *self.0.borrow_mut() = None;
    }
}

struct Always(u32);

impl RandomSource for Always {
    fn roll(&mut self, _low: u32, _high: u32) -> u32 {
        self.0
    }
}

fn session(roll: u32) -> (EngineContext, SharedSurface, SharedMessages) {
    let surface = SharedSurface::new(200.0, 100.0);
    let messages = SharedMessages::default();
    let ctx = EngineContext::new(EngineConfig::default(), Box::new(surface.clone()))
        .unwrap()
        .with_messages(Box::new(messages.clone()))
        .with_rng(Box::new(Always(roll)));
    (ctx, surface, messages)
}

#[test]
fn pause_round_trip_restores_running_and_clears_messages() {
    let (mut ctx, surface, messages) = session(9);
    ctx.world_mut()
        .spawn(Entity::player(Rect::new(50.0, 50.0, 10.0, 10.0)).unwrap());
    ctx.msg_print("Game over");

    ctx.key_down(KeyCode::Space, false).unwrap();
    assert!(ctx.is_paused());
    let overlay = surface.take();
    assert!(overlay
        .iter()
        .any(|c| matches!(c, DrawCommand::FillText { text, .. } if text == PAUSE_TEXT)));
    assert!(!overlay.iter().any(|c| matches!(c, DrawCommand::Clear(_))));
    assert_eq!(messages.0.borrow().as_deref(), Some("Game over"));

    // Redraws while paused keep the overlay.
    ctx.redraw().unwrap();
    assert!(surface.take().is_empty());

    ctx.key_up();
    ctx.key_down_legacy(32).unwrap();
    assert!(!ctx.is_paused());
    assert_eq!(messages.0.borrow().as_deref(), None);
    let frame = surface.take();
    assert!(matches!(frame.first(), Some(DrawCommand::Clear(_))));
}

#[test]
fn held_key_moves_until_released() {
    let (mut ctx, _surface, _messages) = session(9);
    ctx.place_borders().unwrap();
    let player = ctx
        .world_mut()
        .spawn(Entity::player(Rect::new(20.0, 50.0, 10.0, 10.0)).unwrap().with_speed(5.0).unwrap());

    ctx.key_down(KeyCode::ArrowLeft, false).unwrap();
    for _ in 0..5 {
        ctx.tick().unwrap();
    }
    // One step to x = 15, then the solid left border (right edge 10) blocks x = 10.
    assert_eq!(ctx.world().get(player).unwrap().bounds().x, 15.0);

    ctx.key_up();
    ctx.key_down(KeyCode::ArrowRight, false).unwrap();
    ctx.tick().unwrap();
    assert_eq!(ctx.world().get(player).unwrap().bounds().x, 20.0);
}

#[test]
fn level_layout_plays_with_destroy_on_contact_roamers() {
    let config = EngineConfig {
        roam_contact: ContactPolicy::DestroyOnContact,
        ..EngineConfig::default()
    };
    let layout = LevelLayout::from_json(
        r#"{
            "borders": { "size": 10, "solid": true },
            "player": { "x": 100, "y": 50, "width": 10, "height": 10 },
            "enemies": [
                { "x": 12, "y": 50, "width": 5, "height": 5, "speed": 2, "behaviour": "roam" },
                { "x": 60, "y": 50, "width": 5, "height": 5, "speed": 2, "behaviour": "roam" }
            ]
        }"#,
    )
    .unwrap();

    let (mut ctx, surface, _messages) = session(1);
    ctx.set_world(layout.build(&config, (200.0, 100.0)).unwrap());
    let roamers: Vec<_> = ctx
        .world()
        .iter_enemies()
        .filter(|(_, e)| e.behaviour() == Behaviour::Roam)
        .map(|(id, _)| id)
        .collect();

    ctx.tick().unwrap();
    assert!(!ctx.world().is_alive(roamers[0]));
    assert_eq!(ctx.world().get(roamers[1]).unwrap().bounds().x, 58.0);
    assert_eq!(ctx.frame_counter(), 1);

    ctx.redraw().unwrap();
    let fills: Vec<_> = surface.0.borrow().filled_rects().collect();
    // Background, four borders, one surviving enemy, player.
    assert_eq!(fills.len(), 7);
    assert_eq!(fills.last().unwrap().1, Color::WHITE);
}
