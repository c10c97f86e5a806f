//! Animation parameter seam and the per-tick parameter snapshot

use std::collections::HashMap;

use super::PARAM_DAMP_TIME;

/// Animator parameter and state names
pub mod params {
    pub const FORWARD: &str = "Forward";
    pub const TURN: &str = "Turn";
    pub const CROUCH: &str = "Crouch";
    pub const ON_GROUND: &str = "OnGround";
    pub const JUMP: &str = "Jump";
    pub const JUMP_LEG: &str = "JumpLeg";

    /// Locomotion state in which a regular jump is allowed
    pub const STATE_GROUNDED: &str = "Grounded";
    pub const STATE_AIRBORNE: &str = "Airborne";
}

/// Receiver of locomotion animation parameters
pub trait AnimationSink {
    fn set_float(&mut self, name: &str, value: f32);

    /// Move a float parameter towards `value`, smoothing over `damp_time` seconds
    fn set_float_damped(&mut self, name: &str, value: f32, _damp_time: f32, _dt: f32) {
        self.set_float(name, value);
    }

    fn set_bool(&mut self, name: &str, value: bool);

    /// Overall playback speed
    fn set_speed(&mut self, speed: f32);

    /// Whether the current locomotion state has the given name
    fn is_in_state(&self, state: &str) -> bool;

    /// Normalized time within the current clip (may exceed 1 for looping clips)
    fn normalized_time(&self) -> f32;
}

/// Parameters emitted by one locomotion tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimatorSnapshot {
    pub forward: f32,
    pub turn: f32,
    pub crouch: bool,
    pub on_ground: bool,
    /// Vertical speed, only sent while not grounded
    pub jump: Option<f32>,
    /// Trailing leg signal, only sent while grounded
    pub jump_leg: Option<f32>,
    pub speed: f32,
}

impl AnimatorSnapshot {
    /// Push this snapshot into a sink
    pub fn apply(&self, sink: &mut impl AnimationSink, dt: f32) {
        sink.set_float_damped(params::FORWARD, self.forward, PARAM_DAMP_TIME, dt);
        sink.set_float_damped(params::TURN, self.turn, PARAM_DAMP_TIME, dt);
        sink.set_bool(params::CROUCH, self.crouch);
        sink.set_bool(params::ON_GROUND, self.on_ground);
        if let Some(jump) = self.jump {
            sink.set_float(params::JUMP, jump);
        }
        if let Some(jump_leg) = self.jump_leg {
            sink.set_float(params::JUMP_LEG, jump_leg);
        }
        sink.set_speed(self.speed);
    }
}

/// In-process animator: stores parameters, damps floats, and switches
/// between the "Grounded" and "Airborne" states from `OnGround`.
#[derive(Debug, Clone)]
pub struct ParameterAnimator {
    floats: HashMap<String, f32>,
    bools: HashMap<String, bool>,
    speed: f32,
    state: &'static str,
    normalized_time: f32,
    clip_length: f32,
}

impl ParameterAnimator {
    /// Create an animator in the "Grounded" state with clips of `clip_length` seconds
    pub fn new(clip_length: f32) -> Self {
        Self {
            floats: HashMap::new(),
            bools: HashMap::new(),
            speed: 1.0,
            state: params::STATE_GROUNDED,
            normalized_time: 0.0,
            clip_length,
        }
    }

    /// Current value of a float parameter
    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    /// Current value of a bool parameter
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }

    /// Playback speed last set
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Force the current state (hosts with their own state graph)
    pub fn set_state(&mut self, state: &'static str) {
        if state != self.state {
            self.state = state;
            self.normalized_time = 0.0;
        }
    }

    /// Advance clip playback by `dt` seconds at the current speed
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 && self.clip_length > 0.0 {
            self.normalized_time += dt * self.speed / self.clip_length;
        }
    }
}

impl Default for ParameterAnimator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl AnimationSink for ParameterAnimator {
    fn set_float(&mut self, name: &str, value: f32) {
        match self.floats.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.floats.insert(name.to_string(), value);
            }
        }
    }

    fn set_float_damped(&mut self, name: &str, value: f32, damp_time: f32, dt: f32) {
        let current = self.float(name).unwrap_or(0.0);
        let next = if damp_time > 0.0 && dt > 0.0 {
            current + (value - current) * (1.0 - (-dt / damp_time).exp())
        } else {
            value
        };
        self.set_float(name, next);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        match self.bools.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.bools.insert(name.to_string(), value);
            }
        }

        if name == params::ON_GROUND {
            let state = if value {
                params::STATE_GROUNDED
            } else {
                params::STATE_AIRBORNE
            };
            self.set_state(state);
        }
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn is_in_state(&self, state: &str) -> bool {
        self.state == state
    }

    fn normalized_time(&self) -> f32 {
        self.normalized_time
    }
}
