use glam::Vec3;
use labyrinth_common::OnceFlag;
use serde::{Deserialize, Serialize};

/// Why the player died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    EnemyBullet,
    EnemyContact,
    Lava,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEnd {
    Won,
    Died(DeathCause),
}

/// Session state as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Playing,
    Ended(SessionEnd),
}

/// The one-shot end-of-session signal.
///
/// Only the first `raise` is recorded. `take` hands it to the shell once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSignal {
    end: Option<SessionEnd>,
    delivered: bool,
}

impl SessionSignal {
    pub fn raise(&mut self, end: SessionEnd) -> bool {
        if self.end.is_some() {
            return false;
        }
        self.end = Some(end);
        true
    }

    pub fn take(&mut self) -> Option<SessionEnd> {
        if self.delivered {
            return None;
        }
        let end = self.end?;
        self.delivered = true;
        Some(end)
    }

    pub fn status(&self) -> SessionStatus {
        match self.end {
            Some(end) => SessionStatus::Ended(end),
            None => SessionStatus::Playing,
        }
    }

    pub fn has_ended(&self) -> bool {
        self.end.is_some()
    }
}

/// Player combat state. Position lives in the locomotion controller's
/// camera.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Last clamped thrust intent.
    pub thrust: Vec3,
    pub fire_cooldown: u32,
    /// Cleared by the no-death toggle.
    pub can_die: bool,
    pub won: OnceFlag,
    pub dead: OnceFlag,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            can_die: true,
            ..Self::default()
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.dead.is_set()
    }

    pub fn has_won(&self) -> bool {
        self.won.is_set()
    }

    pub fn can_fire(&self) -> bool {
        self.fire_cooldown == 0
    }
}
