//! Box-vs-box collision and the rules for what a border contact does.

use serde::{Deserialize, Serialize};

use crate::math::Rect;

/// Returns true if the two boxes overlap. Touching edges count.
///
/// Symmetric: `has_collided(a, b) == has_collided(b, a)`.
pub fn has_collided(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// What happens to a roaming enemy after its move touches a border.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPolicy {
    /// Solid borders roll the move back; non-solid borders destroy the mover.
    #[default]
    Rollback,
    /// Any border contact destroys the mover, solid or not.
    DestroyOnContact,
}

/// Result of a single movement step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move stood without touching a border (or the direction was none).
    Moved,
    /// A solid border was hit and the previous bounds were restored.
    RolledBack,
    /// The mover hit a border and was removed from the world.
    Destroyed,
    /// The mover hit a border that would destroy it but cannot be destroyed
    /// (the player); the move stands.
    Survived,
}

/// Index of the first box in `candidates` that collides with `subject`.
///
/// Candidates are checked in slice order, so with several simultaneous
/// contacts the earliest one wins.
pub fn first_collision<'a, I>(subject: &Rect, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Rect>,
{
    candidates
        .into_iter()
        .position(|candidate| has_collided(subject, candidate))
}
