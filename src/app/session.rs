//! Exclusive write ownership of the sprite position.
//!
//! At most one session (drag or fall) may move the sprite at a time. The
//! [`ActiveSession`] slot holds whichever one currently owns the position, and
//! replacing it is the only way ownership changes hands. Every new session gets
//! a fresh [`Generation`], and every deferred continuation (fall tick, settle
//! timer, hold timer) carries the generation it was scheduled under so it can
//! check liveness before touching anything.

use crate::app::drag::DragSession;
use crate::app::physics::FallSession;
use serde::{Deserialize, Serialize};

/// Liveness marker for deferred continuations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Hands out strictly increasing generations.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    #[must_use]
    pub const fn current(&self) -> Generation {
        Generation(self.current)
    }

    /// Invalidates every generation handed out so far.
    pub fn bump(&mut self) -> Generation {
        self.current += 1;
        Generation(self.current)
    }
}

/// The session currently owning the sprite position.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ActiveSession {
    #[default]
    None,
    /// Pointer is down on the sprite.
    Drag(DragSession),
    /// Gravity simulation in progress.
    Falling(FallSession),
    /// Landed; waiting out the settle delay before returning to idle.
    Settling { generation: Generation },
}

impl ActiveSession {
    /// Generation of the owning session, if any.
    #[must_use]
    pub const fn generation(&self) -> Option<Generation> {
        match self {
            Self::None => None,
            Self::Drag(drag) => Some(drag.generation()),
            Self::Falling(fall) => Some(fall.generation()),
            Self::Settling { generation } => Some(*generation),
        }
    }

    /// Whether a deferred continuation scheduled under `generation` may still act.
    #[must_use]
    pub fn is_live(&self, generation: Generation) -> bool {
        self.generation() == Some(generation)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Drag(_) => "drag",
            Self::Falling(_) => "falling",
            Self::Settling { .. } => "settling",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_invalidates_previous() {
        let mut counter = GenerationCounter::default();
        let first = counter.bump();
        let second = counter.bump();

        assert!(second > first);
        assert_eq!(counter.current(), second);

        let session = ActiveSession::Settling { generation: second };
        assert!(session.is_live(second));
        assert!(!session.is_live(first));
        assert!(!ActiveSession::None.is_live(first));
    }
}
