use std::collections::HashMap;

use crate::collision::{first_collision, has_collided, ContactPolicy, MoveOutcome};
use crate::entity::{Entity, Movable, Role};
use crate::error::EngineError;
use crate::math::{Direction, Rect};
use crate::render::Color;

/// Unique identifier for an entity in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(u32);

impl EntityId {
    /// Get the underlying integer ID (useful for debugging or serialization).
    pub fn to_u32(self) -> u32 {
        self.0
    }
}

/// Gravity applied by a fresh world, in pixels per tick.
pub const DEFAULT_GRAVITY: f32 = 1.0;

/// Container for every box in the game.
///
/// Besides storage the world keeps three ordered collections:
/// - all entities (the player included)
/// - enemies (borders included, since borders are stationary enemies)
/// - borders
///
/// Every id in the enemy or border list is also in the entity list. The
/// border list keeps placement order, which decides which border wins when
/// a move touches several at once.
#[derive(Debug)]
pub struct World {
    next_id: u32,
    storage: HashMap<EntityId, Entity>,
    entities: Vec<EntityId>,
    enemies: Vec<EntityId>,
    borders: Vec<EntityId>,
    player: Option<EntityId>,
    gravity: f32,
    roam_contact: ContactPolicy,
}

impl World {
    /// Create a new, empty world.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            storage: HashMap::new(),
            entities: Vec::new(),
            enemies: Vec::new(),
            borders: Vec::new(),
            player: None,
            gravity: DEFAULT_GRAVITY,
            roam_contact: ContactPolicy::default(),
        }
    }

    /// Add an entity and register it in every collection its role belongs to.
    ///
    /// Spawning a player while one exists replaces the old player.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);

        match entity.role() {
            Role::Player { .. } => {
                if let Some(old) = self.player.take() {
                    log::warn!("replacing player {:?} with {:?}", old, id);
                    self.unregister(old);
                }
                self.player = Some(id);
            }
            Role::Enemy { .. } => self.enemies.push(id),
            Role::Border => {
                self.enemies.push(id);
                self.borders.push(id);
            }
        }
        self.entities.push(id);
        log::debug!("spawned {:?} as {:?} at {:?}", id, entity.role(), entity.bounds());
        self.storage.insert(id, entity);
        id
    }

    /// Destroy an entity, removing it from every collection.
    ///
    /// Destroying the player is a no-op and returns `Ok(false)`.
    pub fn destroy(&mut self, id: EntityId) -> Result<bool, EngineError> {
        let entity = self.get(id).ok_or(EngineError::UnknownEntity(id))?;
        if !entity.is_destructible() {
            return Ok(false);
        }
        self.unregister(id);
        log::debug!("destroyed {:?}", id);
        Ok(true)
    }

    fn unregister(&mut self, id: EntityId) {
        self.storage.remove(&id);
        self.entities.retain(|&e| e != id);
        self.enemies.retain(|&e| e != id);
        self.borders.retain(|&e| e != id);
        if self.player == Some(id) {
            self.player = None;
        }
    }

    /// Check if an entity is currently alive.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.storage.contains_key(&id)
    }

    /// Number of alive entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if there are no entities in the world.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.storage.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.storage.get_mut(&id)
    }

    /// All entities in spawn order.
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Enemies (borders included) in spawn order.
    pub fn enemies(&self) -> &[EntityId] {
        &self.enemies
    }

    /// Borders in placement order.
    pub fn borders(&self) -> &[EntityId] {
        &self.borders
    }

    /// Iterate over enemies (borders included) with their data.
    pub fn iter_enemies(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.enemies
            .iter()
            .filter_map(|&id| self.storage.get(&id).map(|entity| (id, entity)))
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player(&self) -> Result<&Entity, EngineError> {
        self.player
            .and_then(|id| self.storage.get(&id))
            .ok_or(EngineError::NoActivePlayer)
    }

    pub fn player_mut(&mut self) -> Result<&mut Entity, EngineError> {
        let id = self.player.ok_or(EngineError::NoActivePlayer)?;
        self.storage
            .get_mut(&id)
            .ok_or(EngineError::NoActivePlayer)
    }

    /// Adjust the player's score. Returns the new score.
    pub fn add_score(&mut self, delta: i64) -> Result<u32, EngineError> {
        let player = self.player_mut().inspect_err(|_| {
            log::warn!("score change of {} ignored: no player", delta);
        })?;
        Ok(player.add_score(delta).unwrap_or(0))
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: f32) -> Result<(), EngineError> {
        if !gravity.is_finite() {
            return Err(EngineError::InvalidGravity(gravity));
        }
        self.gravity = gravity;
        Ok(())
    }

    pub fn roam_contact(&self) -> ContactPolicy {
        self.roam_contact
    }

    pub fn set_roam_contact(&mut self, policy: ContactPolicy) {
        self.roam_contact = policy;
    }

    /// Move an entity one step at its own speed, then check the move.
    pub fn move_entity(
        &mut self,
        id: EntityId,
        direction: Direction,
    ) -> Result<MoveOutcome, EngineError> {
        let speed = self.get(id).ok_or(EngineError::UnknownEntity(id))?.speed();
        self.move_entity_by(id, direction, speed)
    }

    /// Move an entity `distance` pixels, then check the move.
    pub fn move_entity_by(
        &mut self,
        id: EntityId,
        direction: Direction,
        distance: f32,
    ) -> Result<MoveOutcome, EngineError> {
        self.get_mut(id)
            .ok_or(EngineError::UnknownEntity(id))?
            .step(direction, distance);
        self.check_valid_move(id)
    }

    /// Move an entity one step and resolve border contact with `policy`.
    pub fn move_with_policy(
        &mut self,
        id: EntityId,
        direction: Direction,
        policy: ContactPolicy,
    ) -> Result<MoveOutcome, EngineError> {
        match policy {
            ContactPolicy::Rollback => self.move_entity(id, direction),
            ContactPolicy::DestroyOnContact => {
                let entity = self.get_mut(id).ok_or(EngineError::UnknownEntity(id))?;
                let speed = entity.speed();
                entity.step(direction, speed);
                if self.first_border_hit(id)?.is_none() {
                    return Ok(MoveOutcome::Moved);
                }
                self.destroy_or_survive(id)
            }
        }
    }

    /// Resolve the entity's current position against the borders.
    ///
    /// Only the first colliding border in placement order counts: a solid
    /// one rolls the last move back, anything else destroys the entity.
    pub fn check_valid_move(&mut self, id: EntityId) -> Result<MoveOutcome, EngineError> {
        let Some((border, solid)) = self.first_border_hit(id)? else {
            return Ok(MoveOutcome::Moved);
        };

        if solid {
            if let Some(entity) = self.get_mut(id) {
                entity.rollback_move();
            }
            log::debug!("{:?} blocked by solid border {:?}", id, border);
            Ok(MoveOutcome::RolledBack)
        } else {
            self.destroy_or_survive(id)
        }
    }

    fn destroy_or_survive(&mut self, id: EntityId) -> Result<MoveOutcome, EngineError> {
        if self.destroy(id)? {
            Ok(MoveOutcome::Destroyed)
        } else {
            Ok(MoveOutcome::Survived)
        }
    }

    fn first_border_hit(&self, id: EntityId) -> Result<Option<(EntityId, bool)>, EngineError> {
        let bounds = self.get(id).ok_or(EngineError::UnknownEntity(id))?.bounds();
        let candidates: Vec<(EntityId, Rect, bool)> = self
            .borders
            .iter()
            .filter(|&&border| border != id)
            .filter_map(|&border| {
                self.storage
                    .get(&border)
                    .map(|b| (border, b.bounds(), b.solid))
            })
            .collect();

        Ok(first_collision(&bounds, candidates.iter().map(|(_, rect, _)| rect))
            .map(|index| (candidates[index].0, candidates[index].2)))
    }

    /// Move an entity down by the world's gravity and check the move.
    pub fn apply_gravity(&mut self, id: EntityId) -> Result<MoveOutcome, EngineError> {
        let gravity = self.gravity;
        self.move_entity_by(id, Direction::Down, gravity)
    }

    /// Apply gravity to every entity that is affected by it.
    ///
    /// Works on a snapshot of the entity list so destruction mid-pass cannot
    /// skip anyone.
    pub fn apply_all_gravity(&mut self) -> Result<(), EngineError> {
        let snapshot = self.entities.clone();
        for id in snapshot {
            let affected = self
                .get(id)
                .map(|entity| entity.affected_by_gravity)
                .unwrap_or(false);
            if affected {
                self.apply_gravity(id)?;
            }
        }
        Ok(())
    }

    /// Replace any existing borders with four boxes `size` thick around a
    /// `width` x `height` surface, in the order top, left, right, bottom.
    pub fn place_borders(
        &mut self,
        size: f32,
        solid: bool,
        (width, height): (f32, f32),
        colour: Color,
    ) -> Result<[EntityId; 4], EngineError> {
        let rects = [
            Rect::try_new(0.0, 0.0, width, size)?,
            Rect::try_new(0.0, 0.0, size, height)?,
            Rect::try_new(width - size, 0.0, size, height)?,
            Rect::try_new(0.0, height - size, width, size)?,
        ];

        for old in std::mem::take(&mut self.borders) {
            self.unregister(old);
        }

        let mut ids = [EntityId(0); 4];
        for (slot, rect) in ids.iter_mut().zip(rects) {
            *slot = self.spawn(Entity::border(rect, solid)?.with_colour(colour));
        }
        log::info!(
            "placed {} borders of size {} around {}x{}",
            if solid { "solid" } else { "non-solid" },
            size,
            width,
            height
        );
        Ok(ids)
    }

    /// Destroy every enemy that is not a border.
    pub fn clear_enemies(&mut self) {
        let doomed: Vec<EntityId> = self
            .iter_enemies()
            .filter(|(_, entity)| !entity.is_border())
            .map(|(id, _)| id)
            .collect();
        for id in doomed {
            self.unregister(id);
        }
    }

    /// Enemies (borders excluded) currently colliding with `id`.
    pub fn enemies_touching(&self, id: EntityId) -> Result<Vec<EntityId>, EngineError> {
        let bounds = self.get(id).ok_or(EngineError::UnknownEntity(id))?.bounds();
        Ok(self
            .iter_enemies()
            .filter(|&(other, entity)| {
                other != id && !entity.is_border() && has_collided(&bounds, &entity.bounds())
            })
            .map(|(other, _)| other)
            .collect())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Palette;

    const CANVAS: (f32, f32) = (100.0, 100.0);

    fn bordered(solid: bool) -> World {
        let mut world = World::new();
        world
            .place_borders(10.0, solid, CANVAS, Palette::default().border)
            .unwrap();
        world
    }

    fn enemy_at(x: f32, y: f32) -> Entity {
        Entity::enemy(Rect::new(x, y, 10.0, 10.0)).unwrap()
    }

    #[test]
    fn borders_are_tracked_as_entities_and_enemies() {
        let world = bordered(true);
        assert_eq!(world.borders().len(), 4);
        for id in world.borders() {
            assert!(world.enemies().contains(id));
            assert!(world.entities().contains(id));
        }
    }

    #[test]
    fn replacing_borders_drops_the_old_ones_everywhere() {
        let mut world = bordered(false);
        let old = world.borders().to_vec();
        world
            .place_borders(5.0, true, CANVAS, Palette::default().border)
            .unwrap();
        assert_eq!(world.len(), 4);
        for id in old {
            assert!(!world.is_alive(id));
            assert!(!world.enemies().contains(&id));
        }
    }

    #[test]
    fn enemy_hitting_non_solid_border_is_destroyed_everywhere() {
        let mut world = bordered(false);
        let enemy = world.spawn(enemy_at(21.0, 50.0).with_speed(11.0).unwrap());

        assert_eq!(
            world.move_entity(enemy, Direction::Left).unwrap(),
            MoveOutcome::Destroyed
        );
        assert!(!world.is_alive(enemy));
        assert!(!world.entities().contains(&enemy));
        assert!(!world.enemies().contains(&enemy));
    }

    #[test]
    fn solid_border_rolls_the_move_back() {
        let mut world = bordered(true);
        let enemy = world.spawn(enemy_at(12.0, 50.0).with_speed(5.0).unwrap());
        let before = world.get(enemy).unwrap().bounds();

        assert_eq!(
            world.move_entity(enemy, Direction::Left).unwrap(),
            MoveOutcome::RolledBack
        );
        assert_eq!(world.get(enemy).unwrap().bounds(), before);
    }

    #[test]
    fn player_survives_non_solid_border() {
        let mut world = bordered(false);
        let player = world.spawn(Entity::player(Rect::new(12.0, 50.0, 10.0, 10.0)).unwrap());

        assert_eq!(
            world.move_entity_by(player, Direction::Left, 3.0).unwrap(),
            MoveOutcome::Survived
        );
        assert_eq!(world.player().unwrap().bounds().x, 9.0);
        assert_eq!(world.destroy(player), Ok(false));
    }

    #[test]
    fn first_border_in_placement_order_wins() {
        let mut world = World::new();
        let solid = world.spawn(Entity::border(Rect::new(0.0, 0.0, 100.0, 10.0), true).unwrap());
        world.spawn(Entity::border(Rect::new(0.0, 0.0, 10.0, 100.0), false).unwrap());
        assert_eq!(world.borders()[0], solid);

        // Already touching the left border; moving up touches the top one too.
        let enemy = world.spawn(enemy_at(10.0, 12.0).with_speed(3.0).unwrap());
        assert_eq!(
            world.move_entity(enemy, Direction::Up).unwrap(),
            MoveOutcome::RolledBack
        );
        assert!(world.is_alive(enemy));
    }

    #[test]
    fn destroy_on_contact_ignores_solidity() {
        let mut world = bordered(true);
        let enemy = world.spawn(enemy_at(12.0, 50.0).with_speed(5.0).unwrap());
        assert_eq!(
            world
                .move_with_policy(enemy, Direction::Left, ContactPolicy::DestroyOnContact)
                .unwrap(),
            MoveOutcome::Destroyed
        );
        assert!(!world.is_alive(enemy));
    }

    #[test]
    fn gravity_pulls_until_solid_floor() {
        let mut world = bordered(true);
        world.set_gravity(4.0).unwrap();
        let faller = world.spawn(enemy_at(50.0, 75.0).with_gravity(true));
        let floating = world.spawn(enemy_at(30.0, 30.0));

        world.apply_all_gravity().unwrap();
        assert_eq!(world.get(faller).unwrap().bounds().y, 79.0);
        world.apply_all_gravity().unwrap();
        // 83 + 10 would touch the floor at y = 90.
        assert_eq!(world.get(faller).unwrap().bounds().y, 79.0);
        assert_eq!(world.get(floating).unwrap().bounds().y, 30.0);
    }

    #[test]
    fn gravity_pass_survives_destruction() {
        let mut world = bordered(false);
        let a = world.spawn(enemy_at(20.0, 79.0).with_gravity(true));
        let b = world.spawn(enemy_at(50.0, 79.0).with_gravity(true));
        let c = world.spawn(enemy_at(70.0, 40.0).with_gravity(true));

        world.apply_all_gravity().unwrap();
        assert!(!world.is_alive(a));
        assert!(!world.is_alive(b));
        assert_eq!(world.get(c).unwrap().bounds().y, 41.0);
    }

    #[test]
    fn clear_enemies_keeps_borders_and_player() {
        let mut world = bordered(true);
        world.spawn(Entity::player(Rect::new(40.0, 40.0, 5.0, 5.0)).unwrap());
        world.spawn(enemy_at(20.0, 20.0));
        world.spawn(enemy_at(60.0, 60.0));

        world.clear_enemies();
        assert_eq!(world.enemies().len(), 4);
        assert_eq!(world.len(), 5);
        assert!(world.player().is_ok());
    }

    #[test]
    fn enemies_touching_reports_overlaps() {
        let mut world = bordered(true);
        let player = world.spawn(Entity::player(Rect::new(40.0, 40.0, 10.0, 10.0)).unwrap());
        let near = world.spawn(enemy_at(49.0, 40.0));
        world.spawn(enemy_at(70.0, 70.0));

        assert_eq!(world.enemies_touching(player).unwrap(), vec![near]);
    }

    #[test]
    fn missing_player_and_unknown_ids_are_errors() {
        let mut world = World::new();
        assert_eq!(world.add_score(1), Err(EngineError::NoActivePlayer));
        let ghost = world.spawn(enemy_at(0.0, 0.0));
        world.destroy(ghost).unwrap();
        assert_eq!(
            world.move_entity(ghost, Direction::Up),
            Err(EngineError::UnknownEntity(ghost))
        );
        assert!(matches!(
            world.set_gravity(f32::NAN),
            Err(EngineError::InvalidGravity(_))
        ));
    }

    #[test]
    fn spawning_a_second_player_replaces_the_first() {
        let mut world = World::new();
        let first = world.spawn(Entity::player(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap());
        let second = world.spawn(Entity::player(Rect::new(5.0, 5.0, 1.0, 1.0)).unwrap());
        assert!(!world.is_alive(first));
        assert_eq!(world.player_id(), Some(second));
        assert_eq!(world.len(), 1);
    }
}
