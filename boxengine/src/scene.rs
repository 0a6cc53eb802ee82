//! Level layouts: JSON descriptions of the boxes a game starts with.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::entity::{Behaviour, Entity, DEFAULT_SPEED};
use crate::math::Rect;
use crate::render::Color;
use crate::world::World;

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

/// Screen-edge borders to place around the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderLayout {
    pub size: f32,
    pub solid: bool,
}

/// One box in a layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxLayout {
    #[serde(flatten)]
    pub bounds: Rect,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub gravity: bool,
    #[serde(default)]
    pub colour: Option<Color>,
    #[serde(default)]
    pub behaviour: Behaviour,
}

impl BoxLayout {
    fn into_entity(self, base: Entity) -> Result<Entity> {
        let mut entity = base
            .with_speed(self.speed)?
            .with_gravity(self.gravity)
            .with_behaviour(self.behaviour);
        entity.colour = self.colour;
        Ok(entity)
    }
}

/// Complete starting layout of a level.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    #[serde(default)]
    pub borders: Option<BorderLayout>,
    #[serde(default)]
    pub player: Option<BoxLayout>,
    #[serde(default)]
    pub enemies: Vec<BoxLayout>,
}

impl LevelLayout {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a layout from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read level {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in level {}", path.display()))
    }

    /// Build a world for a `canvas` sized surface, using the config's
    /// gravity, roam policy and border colour. Borders come first so they
    /// keep placement order.
    pub fn build(&self, config: &EngineConfig, canvas: (f32, f32)) -> Result<World> {
        let mut world = World::new();
        world.set_gravity(config.gravity)?;
        world.set_roam_contact(config.roam_contact);

        if let Some(borders) = &self.borders {
            world.place_borders(borders.size, borders.solid, canvas, config.palette.border)?;
        }
        if let Some(player) = &self.player {
            let base = Entity::player(player.bounds)?;
            world.spawn(player.clone().into_entity(base)?);
        }
        for (index, enemy) in self.enemies.iter().enumerate() {
            let base = Entity::enemy(enemy.bounds).with_context(|| format!("enemy #{index}"))?;
            world.spawn(enemy.clone().into_entity(base)?);
        }
        log::info!(
            "built level with {} entities ({} enemies)",
            world.len(),
            self.enemies.len()
        );
        Ok(world)
    }
}
