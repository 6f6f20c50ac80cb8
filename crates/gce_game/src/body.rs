//! Kinematic state shared by every simulated object.
//!
//! Boxes are axis-aligned, positioned by their top-left corner, with y growing
//! downward. Velocities are px/s and accelerations px/s².

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Direction pointing along `dx`; zero counts as left.
    pub fn toward(dx: f32) -> Self {
        if dx > 0.0 {
            Self::Right
        } else {
            Self::Left
        }
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    pub gravity_scale: f32,
    /// Horizontal damping rate per second.
    pub friction: f32,
    pub on_ground: bool,
    pub facing: Facing,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            gravity_scale: 1.0,
            friction: 0.0,
            on_ground: false,
            facing: Facing::Right,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        aabb_overlap(self.pos, self.size, other.pos, other.size)
    }

    /// One explicit-Euler step: gravity, horizontal damping, acceleration,
    /// then position. Clears `on_ground`; tile resolution sets it again if the
    /// body lands.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.vel.y += gravity * self.gravity_scale * dt;
        self.vel.x *= (1.0 - self.friction * dt).max(0.0);
        self.vel += self.accel * dt;
        self.pos += self.vel * dt;
        self.on_ground = false;
    }
}

/// Strict AABB intersection; boxes that only touch along an edge do not overlap.
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}
