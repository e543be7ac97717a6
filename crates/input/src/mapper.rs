use std::collections::BTreeSet;
use std::str::FromStr;

use glam::{Vec2, Vec3};

use crate::action::{Action, FrameInput};

/// Logical keys with a binding in the default layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    W,
    A,
    S,
    D,
    Z,
    Space,
    M,
    G,
    F,
    T,
    P,
    C,
}

/// What a key does when held or pressed.
enum Binding {
    Thrust(Vec3),
    Fire,
    Grenade,
    Action(Action),
}

impl Key {
    fn binding(self) -> Binding {
        match self {
            Key::W => Binding::Thrust(Vec3::Z),
            Key::S => Binding::Thrust(Vec3::NEG_Z),
            Key::A => Binding::Thrust(Vec3::X),
            Key::D => Binding::Thrust(Vec3::NEG_X),
            Key::Z => Binding::Thrust(Vec3::Y),
            Key::Space => Binding::Action(Action::Jump),
            Key::M => Binding::Fire,
            Key::G => Binding::Grenade,
            Key::F => Binding::Action(Action::ToggleFlashDemo),
            Key::T => Binding::Action(Action::ToggleFreeze),
            Key::P => Binding::Action(Action::ToggleNoDeath),
            Key::C => Binding::Action(Action::ToggleTeleport),
        }
    }
}

impl FromStr for Key {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.to_ascii_lowercase().as_str() {
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "z" => Key::Z,
            "space" | " " => Key::Space,
            "m" => Key::M,
            "g" => Key::G,
            "f" => Key::F,
            "t" => Key::T,
            "p" => Key::P,
            "c" => Key::C,
            _ => return Err(InputError::UnknownKey(s.to_string())),
        };
        Ok(key)
    }
}

/// Errors from parsing key scripts.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputError {
    #[error("unknown key {0:?}")]
    UnknownKey(String),
    #[error("invalid repeat count in step {0:?}")]
    InvalidRepeat(String),
    #[error("invalid look delta in step {0:?}")]
    InvalidLook(String),
    #[error("script spans more than {} frames", MAX_SCRIPT_FRAMES)]
    TooLong,
}

/// Upper bound on the frames a single script may expand to.
pub const MAX_SCRIPT_FRAMES: u32 = 1_000_000;

/// Turns key up/down events into per-frame `FrameInput`.
///
/// Movement keys contribute while held; every other key produces its
/// effect once, on the frame it goes down.
#[derive(Debug, Default)]
pub struct InputMapper {
    held: BTreeSet<Key>,
    pending_fire: bool,
    pending_grenade: bool,
    pending_actions: Vec<Action>,
    look: Vec2,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        let newly_pressed = self.held.insert(key);
        if !newly_pressed {
            return;
        }
        match key.binding() {
            Binding::Thrust(_) => {}
            Binding::Fire => self.pending_fire = true,
            Binding::Grenade => self.pending_grenade = true,
            Binding::Action(action) => self.pending_actions.push(action),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Release every key and drop one-shots not yet taken by [`Self::frame`].
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pending_fire = false;
        self.pending_grenade = false;
        self.pending_actions.clear();
    }

    /// Accumulate mouse movement until the next frame.
    pub fn mouse_moved(&mut self, dx: f32, dy: f32) {
        self.look += Vec2::new(dx, dy);
    }

    /// Produce this frame's input and clear the one-shot state.
    pub fn frame(&mut self) -> FrameInput {
        let thrust = self
            .held
            .iter()
            .filter_map(|k| match k.binding() {
                Binding::Thrust(t) => Some(t),
                _ => None,
            })
            .fold(Vec3::ZERO, |acc, t| acc + t);
        let input = FrameInput {
            thrust,
            look_delta: std::mem::take(&mut self.look),
            fire: std::mem::take(&mut self.pending_fire),
            throw_grenade: std::mem::take(&mut self.pending_grenade),
            actions: std::mem::take(&mut self.pending_actions),
        };
        tracing::trace!(?input.thrust, actions = input.actions.len(), "input frame");
        input
    }
}

/// One scripted step: keys held for `frames` frames.
#[derive(Debug, Clone, PartialEq)]
struct ScriptStep {
    keys: Vec<Key>,
    look: Vec2,
    frames: u32,
}

/// A scripted key sequence for headless runs.
///
/// Syntax: comma-separated steps; each step is `+`-joined keys (or `-` for
/// no keys) with an optional `*N` repeat. `look:DX:DY` inside a step adds
/// mouse movement on its first frame. Example: `w*30,w+m,look:90:0,d*5,-*10`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyScript {
    steps: Vec<ScriptStep>,
}

impl KeyScript {
    pub fn parse(src: &str) -> Result<Self, InputError> {
        let mut steps = Vec::new();
        let mut total: u32 = 0;
        for raw in src.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (body, frames) = match raw.rsplit_once('*') {
                Some((body, n)) => {
                    let frames = n
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| InputError::InvalidRepeat(raw.to_string()))?;
                    (body.trim(), frames)
                }
                None => (raw, 1),
            };
            total = total
                .checked_add(frames)
                .filter(|t| *t <= MAX_SCRIPT_FRAMES)
                .ok_or(InputError::TooLong)?;
            let mut keys = Vec::new();
            let mut look = Vec2::ZERO;
            for token in body.split('+').map(str::trim).filter(|t| !t.is_empty()) {
                if token == "-" {
                    continue;
                }
                if let Some(rest) = token.strip_prefix("look:") {
                    look += parse_look(rest).ok_or_else(|| InputError::InvalidLook(raw.to_string()))?;
                    continue;
                }
                keys.push(token.parse()?);
            }
            steps.push(ScriptStep { keys, look, frames });
        }
        Ok(Self { steps })
    }

    /// Total number of frames the script spans. Never exceeds
    /// [`MAX_SCRIPT_FRAMES`].
    pub fn frame_count(&self) -> u32 {
        self.steps.iter().map(|s| s.frames).sum()
    }

    /// Expand the script into per-frame inputs.
    pub fn frames(&self) -> Vec<FrameInput> {
        let mut mapper = InputMapper::new();
        let mut out = Vec::with_capacity(self.frame_count() as usize);
        for step in &self.steps {
            for &key in &step.keys {
                mapper.key_down(key);
            }
            for i in 0..step.frames {
                if i == 0 {
                    mapper.mouse_moved(step.look.x, step.look.y);
                }
                out.push(mapper.frame());
            }
            mapper.release_all();
        }
        out
    }
}

fn parse_look(rest: &str) -> Option<Vec2> {
    let (dx, dy) = rest.split_once(':')?;
    Some(Vec2::new(dx.trim().parse().ok()?, dy.trim().parse().ok()?))
}
