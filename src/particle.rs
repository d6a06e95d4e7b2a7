// Simple particle struct to keep track of individual position, velocity, radius and color

use crate::color::Color;
use crate::config::FieldConfig;
use crate::pointer::PointerState;
use glm::DVec2;
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub color: Color,
}

impl Particle {
    pub fn new(
        pos_x: f64,
        pos_y: f64,
        vel_x: f64,
        vel_y: f64,
        radius: f64,
        color: Color,
    ) -> Particle {
        Particle {
            pos: glm::vec2(pos_x, pos_y),
            vel: glm::vec2(vel_x, vel_y),
            radius,
            color,
        }
    }

    pub fn random<R: Rng>(rng: &mut R, width: u32, height: u32, config: &FieldConfig) -> Particle {
        let pos_x = rng.gen::<f64>() * width as f64;
        let pos_y = rng.gen::<f64>() * height as f64;
        let vel_x = (rng.gen::<f64>() * 2.0 - 1.0) * config.max_speed;
        let vel_y = (rng.gen::<f64>() * 2.0 - 1.0) * config.max_speed;
        let radius = config.min_radius + rng.gen::<f64>() * (config.max_radius - config.min_radius);
        Particle::new(pos_x, pos_y, vel_x, vel_y, radius, config.particle_color)
    }

    // Reverse direction on any axis where the particle is past the canvas edge
    pub fn bounce(&mut self, width: f64, height: f64) {
        if self.pos.x > width || self.pos.x < 0.0 {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y > height || self.pos.y < 0.0 {
            self.vel.y = -self.vel.y;
        }
    }

    // Push the particle away from the pointer, returns the displacement applied.
    // Strength falls off linearly from `force` at the pointer to zero at its radius.
    pub fn repel(&mut self, pointer: &PointerState, force: f64) -> DVec2 {
        let pointer_pos = match pointer.position {
            Some(p) => p,
            None => return glm::vec2(0.0, 0.0),
        };
        let away = self.pos - pointer_pos;
        let distance = glm::length(&away);
        if distance >= pointer.radius + self.radius {
            return glm::vec2(0.0, 0.0);
        }

        // Pointer sits exactly on the particle, fall back to its heading
        let direction = if distance > 0.0 {
            away / distance
        } else if glm::length(&self.vel) > 0.0 {
            glm::normalize(&self.vel)
        } else {
            glm::vec2(1.0, 0.0)
        };
        let strength = ((pointer.radius - distance) / pointer.radius).max(0.0) * force;
        let displacement = direction * strength;
        self.pos += displacement;
        displacement
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    // Clamp back onto the canvas, leaving velocity pointing inward on the clamped axis
    pub fn contain(&mut self, width: f64, height: f64) {
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x > width {
            self.pos.x = width;
            self.vel.x = -self.vel.x.abs();
        }
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y > height {
            self.pos.y = height;
            self.vel.y = -self.vel.y.abs();
        }
    }

    pub fn update(&mut self, width: f64, height: f64, pointer: &PointerState, force: f64) {
        self.bounce(width, height);
        self.repel(pointer, force);
        self.advance();
        self.contain(width, height);
    }
}
