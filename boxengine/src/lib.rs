//! boxengine - a tiny 2D engine where everything is a box.
//!
//! Players, enemies and screen borders are axis-aligned boxes that step
//! around a canvas-like [`Surface`], collide with closed-rectangle overlap
//! tests, and stop behind a pause menu when space is pressed.

pub mod ai;
pub mod collision;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod input;
pub mod math;
pub mod message;
pub mod render;
pub mod scene;
pub mod state;
pub mod world;

pub use crate::ai::RandomSource;
pub use crate::collision::{has_collided, ContactPolicy, MoveOutcome};
pub use crate::config::EngineConfig;
pub use crate::engine::{Engine, EngineContext, Game};
pub use crate::entity::{Behaviour, Entity, Movable, Role};
pub use crate::error::EngineError;
pub use crate::input::{InputCommand, InputHandler};
pub use crate::math::{Direction, Rect, Vec2};
pub use crate::message::{MessageArea, MessageBoard};
pub use crate::render::{Color, DrawCommand, DrawList, Font, Palette, Renderer, Surface, TextGrid};
pub use crate::scene::LevelLayout;
pub use crate::state::RunState;
pub use crate::world::{EntityId, World};
pub use winit::keyboard::KeyCode;
