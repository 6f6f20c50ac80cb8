//! Normalized control state.
//!
//! The simulation never looks at devices. Whatever collects keyboard, touch or
//! gamepad input produces one `ControlState` per source, merges them, and hands
//! the result to the world before each frame. Every field is level-triggered:
//! true for as long as the control is held.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Shoot,
}

impl Control {
    pub const ALL: &'static [Control] = &[
        Control::Left,
        Control::Right,
        Control::Up,
        Control::Down,
        Control::Jump,
        Control::Shoot,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub shoot: bool,
}

impl ControlState {
    /// Build a snapshot from the set of controls currently held.
    pub fn from_held<I: IntoIterator<Item = Control>>(held: I) -> Self {
        let mut state = Self::default();
        for control in held {
            state.set(control, true);
        }
        state
    }

    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Left => self.left,
            Control::Right => self.right,
            Control::Up => self.up,
            Control::Down => self.down,
            Control::Jump => self.jump,
            Control::Shoot => self.shoot,
        }
    }

    pub fn set(&mut self, control: Control, held: bool) {
        match control {
            Control::Left => self.left = held,
            Control::Right => self.right = held,
            Control::Up => self.up = held,
            Control::Down => self.down = held,
            Control::Jump => self.jump = held,
            Control::Shoot => self.shoot = held,
        }
    }

    /// Combine two sources: a control is held if either source holds it.
    pub fn merge(self, other: ControlState) -> ControlState {
        ControlState {
            left: self.left || other.left,
            right: self.right || other.right,
            up: self.up || other.up,
            down: self.down || other.down,
            jump: self.jump || other.jump,
            shoot: self.shoot || other.shoot,
        }
    }

    /// Horizontal intent in {-1, 0, 1}. Opposing directions cancel out.
    pub fn horizontal(&self) -> f32 {
        let mut axis = 0.0;
        if self.left {
            axis -= 1.0;
        }
        if self.right {
            axis += 1.0;
        }
        axis
    }
}
