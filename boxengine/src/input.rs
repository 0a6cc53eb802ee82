use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::collision::MoveOutcome;
use crate::error::EngineError;
use crate::math::Direction;
use crate::world::{EntityId, World};

/// What a key press asks the engine to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputCommand {
    /// Hold this direction until the key is released.
    Move(Direction),
    TogglePause,
}

/// Map a legacy DOM `keyCode` (37-40 arrows, 32 space) to a command.
pub fn command_for_legacy_code(code: u32) -> Option<InputCommand> {
    match code {
        37 => Some(InputCommand::Move(Direction::Left)),
        38 => Some(InputCommand::Move(Direction::Up)),
        39 => Some(InputCommand::Move(Direction::Right)),
        40 => Some(InputCommand::Move(Direction::Down)),
        32 => Some(InputCommand::TogglePause),
        _ => None,
    }
}

/// Keyboard state for box games.
///
/// Holds the current movement direction. Movement is level-triggered: a
/// pressed arrow key sets the direction, any key release clears it, and
/// [`InputHandler::handle_default_movement`] applies one step per call while
/// the direction is set.
#[derive(Clone, Debug)]
pub struct InputHandler {
    bindings: HashMap<KeyCode, InputCommand>,
    current: Option<Direction>,
}

impl InputHandler {
    /// Arrow keys move, space toggles pause.
    pub fn new() -> Self {
        let mut handler = Self {
            bindings: HashMap::new(),
            current: None,
        };
        handler.bind(KeyCode::ArrowLeft, InputCommand::Move(Direction::Left));
        handler.bind(KeyCode::ArrowUp, InputCommand::Move(Direction::Up));
        handler.bind(KeyCode::ArrowRight, InputCommand::Move(Direction::Right));
        handler.bind(KeyCode::ArrowDown, InputCommand::Move(Direction::Down));
        handler.bind(KeyCode::Space, InputCommand::TogglePause);
        handler
    }

    /// Bind a key to a command, replacing any previous binding for that key.
    pub fn bind(&mut self, key: KeyCode, command: InputCommand) {
        self.bindings.insert(key, command);
    }

    pub fn command_for(&self, key: KeyCode) -> Option<InputCommand> {
        self.bindings.get(&key).copied()
    }

    /// Current held direction, `None` when no movement key is down.
    pub fn current_direction(&self) -> Option<Direction> {
        self.current
    }

    /// Apply a command's input-side effect and hand it back so the caller can
    /// act on pause toggles.
    pub fn apply(&mut self, command: InputCommand) -> InputCommand {
        if let InputCommand::Move(direction) = command {
            self.current = Some(direction);
        }
        command
    }

    /// A key went down. Auto-repeat presses never toggle pause.
    pub fn press(&mut self, key: KeyCode, repeat: bool) -> Option<InputCommand> {
        let command = self.command_for(key)?;
        if repeat && command == InputCommand::TogglePause {
            return None;
        }
        Some(self.apply(command))
    }

    /// A legacy numeric key code went down.
    pub fn press_legacy(&mut self, code: u32) -> Option<InputCommand> {
        command_for_legacy_code(code).map(|command| self.apply(command))
    }

    /// Any key went up: stop moving.
    pub fn release(&mut self) {
        self.current = None;
    }

    /// Handle a keyboard input event from winit.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<InputCommand> {
        match event.state {
            ElementState::Pressed => match event.physical_key {
                PhysicalKey::Code(key) => self.press(key, event.repeat),
                PhysicalKey::Unidentified(_) => None,
            },
            ElementState::Released => {
                self.release();
                None
            }
        }
    }

    /// Step `player` once in the current direction. Does nothing (and returns
    /// `None`) when no direction is held.
    pub fn handle_default_movement(
        &self,
        world: &mut World,
        player: EntityId,
    ) -> Result<Option<MoveOutcome>, EngineError> {
        match self.current {
            Some(direction) => world.move_entity(player, direction).map(Some),
            None => Ok(None),
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, Movable};
    use crate::math::Rect;

    #[test]
    fn arrows_set_direction_and_release_clears_it() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.press(KeyCode::ArrowUp, false),
            Some(InputCommand::Move(Direction::Up))
        );
        assert_eq!(input.current_direction(), Some(Direction::Up));
        assert_eq!(input.press(KeyCode::KeyQ, false), None);
        assert_eq!(input.current_direction(), Some(Direction::Up));
        input.release();
        assert_eq!(input.current_direction(), None);
    }

    #[test]
    fn space_toggles_but_not_on_repeat() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.press(KeyCode::Space, false),
            Some(InputCommand::TogglePause)
        );
        assert_eq!(input.press(KeyCode::Space, true), None);
        assert_eq!(input.current_direction(), None);
    }

    #[test]
    fn legacy_codes_match_arrow_layout() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.press_legacy(37),
            Some(InputCommand::Move(Direction::Left))
        );
        assert_eq!(input.press_legacy(40), Some(InputCommand::Move(Direction::Down)));
        assert_eq!(input.current_direction(), Some(Direction::Down));
        assert_eq!(input.press_legacy(32), Some(InputCommand::TogglePause));
        assert_eq!(input.press_legacy(65), None);
    }

    #[test]
    fn custom_bindings_add_keys() {
        let mut input = InputHandler::new();
        input.bind(KeyCode::KeyA, InputCommand::Move(Direction::Left));
        input.press(KeyCode::KeyA, false);
        assert_eq!(input.current_direction(), Some(Direction::Left));
    }

    #[test]
    fn default_movement_steps_once_per_call() {
        let mut world = World::new();
        let player = world.spawn(Entity::player(Rect::new(5.0, 5.0, 10.0, 10.0)).unwrap());
        let mut input = InputHandler::new();

        assert_eq!(input.handle_default_movement(&mut world, player).unwrap(), None);

        input.press(KeyCode::ArrowRight, false);
        for _ in 0..3 {
            assert_eq!(
                input.handle_default_movement(&mut world, player).unwrap(),
                Some(MoveOutcome::Moved)
            );
        }
        assert_eq!(world.player().unwrap().bounds().x, 8.0);
    }
}
