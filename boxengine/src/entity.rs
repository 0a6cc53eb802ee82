//! Entities: every object in the world is a box.
//!
//! Players, enemies and borders share one representation and differ only in
//! their [`Role`]. Movement is provided through the [`Movable`] trait; the
//! border checks that follow a move live on [`crate::world::World`], which
//! owns the borders.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::math::{Direction, Rect};
use crate::render::Color;

/// Speed given to new entities unless overridden.
pub const DEFAULT_SPEED: f32 = 1.0;

/// What an enemy does on its turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behaviour {
    /// Stand still.
    #[default]
    Idle,
    /// Step in a random direction (or stand still) every tick.
    Roam,
}

/// Role-specific data of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Player { score: u32 },
    Enemy { behaviour: Behaviour },
    /// A stationary screen-edge box. Borders are also tracked as enemies.
    Border,
}

/// A box participating in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    role: Role,
    bounds: Rect,
    last_bounds: Rect,
    speed: f32,
    /// Pulled down by the world's gravity every tick.
    pub affected_by_gravity: bool,
    /// Movers touching a solid entity roll back instead of being destroyed.
    pub solid: bool,
    /// Fill colour override. `None` draws with the renderer's default.
    pub colour: Option<Color>,
}

impl Entity {
    fn with_role(role: Role, bounds: Rect) -> Result<Self, EngineError> {
        bounds.validate()?;
        Ok(Self {
            role,
            bounds,
            last_bounds: bounds,
            speed: DEFAULT_SPEED,
            affected_by_gravity: false,
            solid: false,
            colour: None,
        })
    }

    pub fn player(bounds: Rect) -> Result<Self, EngineError> {
        Self::with_role(Role::Player { score: 0 }, bounds)
    }

    pub fn enemy(bounds: Rect) -> Result<Self, EngineError> {
        Self::with_role(
            Role::Enemy {
                behaviour: Behaviour::Idle,
            },
            bounds,
        )
    }

    pub fn border(bounds: Rect, solid: bool) -> Result<Self, EngineError> {
        let mut border = Self::with_role(Role::Border, bounds)?;
        border.solid = solid;
        border.speed = 0.0;
        Ok(border)
    }

    /// Set the per-step speed. Negative or non-finite speeds are rejected.
    pub fn with_speed(mut self, speed: f32) -> Result<Self, EngineError> {
        self.set_speed(speed)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    #[must_use]
    pub fn with_colour(mut self, colour: Color) -> Self {
        self.colour = Some(colour);
        self
    }

    /// Set the enemy behaviour. Has no effect on players and borders.
    #[must_use]
    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        if let Role::Enemy { behaviour: current } = &mut self.role {
            *current = behaviour;
        }
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player { .. })
    }

    pub fn is_border(&self) -> bool {
        matches!(self.role, Role::Border)
    }

    /// Players are never removed from the world; everything else can be.
    pub fn is_destructible(&self) -> bool {
        !self.is_player()
    }

    pub fn behaviour(&self) -> Behaviour {
        match self.role {
            Role::Enemy { behaviour } => behaviour,
            _ => Behaviour::Idle,
        }
    }

    /// Player score; zero for everything else.
    pub fn score(&self) -> u32 {
        match self.role {
            Role::Player { score } => score,
            _ => 0,
        }
    }

    /// Adjust the score by `delta`, saturating at zero and `u32::MAX`.
    /// Returns the new score, or `None` if this is not the player.
    pub fn add_score(&mut self, delta: i64) -> Option<u32> {
        match &mut self.role {
            Role::Player { score } => {
                let updated = (i64::from(*score) + delta).clamp(0, i64::from(u32::MAX));
                *score = updated as u32;
                Some(*score)
            }
            _ => None,
        }
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), EngineError> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(EngineError::InvalidSpeed(speed));
        }
        self.speed = speed;
        Ok(())
    }

    /// Bounds saved by the last [`Movable::store_last_position`].
    pub fn last_bounds(&self) -> Rect {
        self.last_bounds
    }
}

/// Shared movement primitives for anything that is a box.
///
/// The default methods only move the box. Whether a move stands is decided
/// afterwards by [`crate::world::World::check_valid_move`].
pub trait Movable {
    fn bounds(&self) -> Rect;

    fn set_bounds(&mut self, bounds: Rect);

    fn speed(&self) -> f32;

    /// Remember the current bounds so the next move can be undone.
    fn store_last_position(&mut self);

    /// Restore the bounds saved by [`Movable::store_last_position`].
    fn rollback_move(&mut self);

    /// Store the current bounds, then move `distance` pixels in `direction`.
    fn step(&mut self, direction: Direction, distance: f32) {
        self.store_last_position();
        let moved = self.bounds().translated(direction.offset() * distance);
        self.set_bounds(moved);
    }

    fn go_left(&mut self) {
        self.step(Direction::Left, self.speed());
    }

    fn go_right(&mut self) {
        self.step(Direction::Right, self.speed());
    }

    fn go_up(&mut self) {
        self.step(Direction::Up, self.speed());
    }

    fn go_down(&mut self) {
        self.step(Direction::Down, self.speed());
    }
}

impl Movable for Entity {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn store_last_position(&mut self) {
        self.last_bounds = self.bounds;
    }

    fn rollback_move(&mut self) {
        self.bounds = self.last_bounds;
    }
}
