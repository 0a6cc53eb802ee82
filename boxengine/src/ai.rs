//! Enemy turns. The only built-in pattern is random roaming.

use crate::collision::MoveOutcome;
use crate::entity::Behaviour;
use crate::error::EngineError;
use crate::math::Direction;
use crate::world::{EntityId, World};

/// Source of the dice rolls that drive enemy AI.
pub trait RandomSource {
    /// Uniform integer in `low..=high`.
    fn roll(&mut self, low: u32, high: u32) -> u32;
}

impl RandomSource for fastrand::Rng {
    fn roll(&mut self, low: u32, high: u32) -> u32 {
        self.u32(low..=high)
    }
}

/// Map a 1..=10 roll to a roam step: 1-2 left, 3-4 up, 5-6 down, 7-8 right,
/// anything else stays put.
pub fn roam_choice(roll: u32) -> Option<Direction> {
    match roll {
        1 | 2 => Some(Direction::Left),
        3 | 4 => Some(Direction::Up),
        5 | 6 => Some(Direction::Down),
        7 | 8 => Some(Direction::Right),
        _ => None,
    }
}

/// Roll once and step `id` accordingly, resolving border contact with the
/// world's roam contact policy. Returns `None` when the roll said to stay.
pub fn roam(
    world: &mut World,
    id: EntityId,
    rng: &mut dyn RandomSource,
) -> Result<Option<MoveOutcome>, EngineError> {
    match roam_choice(rng.roll(1, 10)) {
        Some(direction) => {
            let policy = world.roam_contact();
            world.move_with_policy(id, direction, policy).map(Some)
        }
        None => Ok(None),
    }
}

/// Give every enemy its turn, in enemy order.
///
/// Iterates a snapshot of the enemy list and skips enemies destroyed earlier
/// in the same pass. Idle enemies (and borders) do nothing.
pub fn take_turns(world: &mut World, rng: &mut dyn RandomSource) -> Result<(), EngineError> {
    let snapshot = world.enemies().to_vec();
    for id in snapshot {
        let Some(enemy) = world.get(id) else {
            continue;
        };
        match enemy.behaviour() {
            Behaviour::Idle => {}
            Behaviour::Roam => {
                if let Some(MoveOutcome::Destroyed) = roam(world, id, rng)? {
                    log::debug!("roaming enemy {:?} left the field", id);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::collision::ContactPolicy;
    use crate::entity::{Entity, Movable};
    use crate::math::Rect;
    use crate::render::Color;
    use std::collections::VecDeque;

    /// Replays fixed rolls, then keeps returning the last one.
    pub(crate) struct ScriptedRolls {
        rolls: VecDeque<u32>,
        last: u32,
    }

    impl ScriptedRolls {
        pub(crate) fn new(rolls: &[u32]) -> Self {
            Self {
                rolls: rolls.iter().copied().collect(),
                last: 10,
            }
        }
    }

    impl RandomSource for ScriptedRolls {
        fn roll(&mut self, low: u32, high: u32) -> u32 {
            if let Some(next) = self.rolls.pop_front() {
                self.last = next;
            }
            self.last.clamp(low, high)
        }
    }

    fn roamer(world: &mut World, x: f32, y: f32) -> EntityId {
        world.spawn(
            Entity::enemy(Rect::new(x, y, 10.0, 10.0))
                .unwrap()
                .with_speed(2.0)
                .unwrap()
                .with_behaviour(Behaviour::Roam),
        )
    }

    #[test]
    fn roll_bands_map_to_directions() {
        let expected = [
            Some(Direction::Left),
            Some(Direction::Left),
            Some(Direction::Up),
            Some(Direction::Up),
            Some(Direction::Down),
            Some(Direction::Down),
            Some(Direction::Right),
            Some(Direction::Right),
            None,
            None,
        ];
        for (roll, want) in (1..=10).zip(expected) {
            assert_eq!(roam_choice(roll), want, "roll {roll}");
        }
    }

    #[test]
    fn no_op_band_never_moves() {
        let mut world = World::new();
        let id = roamer(&mut world, 50.0, 50.0);
        let mut rng = ScriptedRolls::new(&[9, 10, 9, 10]);
        for _ in 0..4 {
            assert_eq!(roam(&mut world, id, &mut rng).unwrap(), None);
        }
        assert_eq!(world.get(id).unwrap().bounds(), Rect::new(50.0, 50.0, 10.0, 10.0));
    }

    #[test]
    fn roam_steps_at_own_speed() {
        let mut world = World::new();
        let id = roamer(&mut world, 50.0, 50.0);
        let mut rng = ScriptedRolls::new(&[1, 3, 7, 5]);
        for _ in 0..4 {
            assert_eq!(
                roam(&mut world, id, &mut rng).unwrap(),
                Some(MoveOutcome::Moved)
            );
        }
        assert_eq!(world.get(id).unwrap().bounds(), Rect::new(50.0, 50.0, 10.0, 10.0));
    }

    #[test]
    fn contact_policy_decides_the_fate_of_roamers() {
        let mut world = World::new();
        world
            .place_borders(10.0, true, (100.0, 100.0), Color::LIGHT_GRAY)
            .unwrap();
        let id = roamer(&mut world, 11.0, 50.0);

        let mut rng = ScriptedRolls::new(&[1]);
        assert_eq!(
            roam(&mut world, id, &mut rng).unwrap(),
            Some(MoveOutcome::RolledBack)
        );

        world.set_roam_contact(ContactPolicy::DestroyOnContact);
        assert_eq!(
            roam(&mut world, id, &mut rng).unwrap(),
            Some(MoveOutcome::Destroyed)
        );
        assert!(!world.enemies().contains(&id));
    }

    #[test]
    fn take_turns_skips_idle_enemies_and_survives_destruction() {
        let mut world = World::new();
        world
            .place_borders(10.0, false, (100.0, 100.0), Color::LIGHT_GRAY)
            .unwrap();
        let doomed = roamer(&mut world, 11.0, 50.0);
        let survivor = roamer(&mut world, 50.0, 50.0);
        let idle = world.spawn(Entity::enemy(Rect::new(30.0, 30.0, 5.0, 5.0)).unwrap());

        let mut rng = ScriptedRolls::new(&[1, 1]);
        take_turns(&mut world, &mut rng).unwrap();

        assert!(!world.is_alive(doomed));
        assert_eq!(world.get(survivor).unwrap().bounds().x, 48.0);
        assert_eq!(world.get(idle).unwrap().bounds(), Rect::new(30.0, 30.0, 5.0, 5.0));
    }

    #[test]
    fn fastrand_rolls_stay_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let roll = rng.roll(1, 10);
            assert!((1..=10).contains(&roll));
        }
    }
}
