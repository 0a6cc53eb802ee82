/// Whether the game is running or sitting behind the pause menu.
///
/// The only transition is [`RunState::toggled`], driven by the pause key.
/// The side effects of each transition (overlay, message clearing, redraw)
/// are performed by [`crate::engine::EngineContext::switch_paused`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

impl RunState {
    pub fn is_paused(self) -> bool {
        self == RunState::Paused
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        }
    }
}
