// Tunable constants for the particle field

use crate::color::Color;

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    // Canvas area (px²) per particle. Count is `floor(w * h / area_per_particle)`.
    pub area_per_particle: f64,
    // Velocity on each axis is drawn from `[-max_speed, max_speed]` px/frame.
    pub max_speed: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    // Influence radius of the pointer, in px.
    pub pointer_radius: f64,
    // Displacement (px) applied at zero distance from the pointer.
    pub repulsion_force: f64,
    // Link threshold is `(w / link_divisor) * (h / link_divisor)` as a squared distance.
    pub link_divisor: f64,
    // Squared distance at which link opacity reaches zero.
    pub link_falloff: f64,
    pub link_width: f64,
    pub background: Color,
    pub particle_color: Color,
    pub particle_alpha: f64,
    // Link color when the first particle of the pair is near the pointer.
    pub link_color_hot: Color,
    pub link_color_cool: Color,
    // Wrap every frame in a `console.time` label.
    pub profile_frames: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            area_per_particle: 9000.0,
            max_speed: 0.2,
            min_radius: 1.0,
            max_radius: 3.0,
            pointer_radius: 200.0,
            repulsion_force: 5.0,
            link_divisor: 7.0,
            link_falloff: 20000.0,
            link_width: 1.0,
            background: Color::WHITE,
            particle_color: Color::from_u32(0xbf80ff00),
            particle_alpha: 0.8,
            link_color_hot: Color::from_u32(0xc896ff00),
            link_color_cool: Color::from_u32(0x9664dc00),
            profile_frames: false,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("area_per_particle", self.area_per_particle),
            ("pointer_radius", self.pointer_radius),
            ("link_divisor", self.link_divisor),
            ("link_falloff", self.link_falloff),
            ("link_width", self.link_width),
            ("min_radius", self.min_radius),
        ];
        for (name, value) in positive.iter() {
            if !value.is_finite() || *value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, value));
            }
        }
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(format!("max_speed must be non-negative, got {}", self.max_speed));
        }
        if !self.repulsion_force.is_finite() || self.repulsion_force < 0.0 {
            return Err(format!(
                "repulsion_force must be non-negative, got {}",
                self.repulsion_force
            ));
        }
        if !self.max_radius.is_finite() || self.max_radius < self.min_radius {
            return Err(format!(
                "radius range is empty: [{}, {}]",
                self.min_radius, self.max_radius
            ));
        }
        if !(0.0..=1.0).contains(&self.particle_alpha) {
            return Err(format!(
                "particle_alpha must be within [0, 1], got {}",
                self.particle_alpha
            ));
        }
        Ok(())
    }

    pub fn particle_count(&self, width: u32, height: u32) -> usize {
        (width as f64 * height as f64 / self.area_per_particle).floor() as usize
    }

    pub fn link_threshold_sq(&self, width: u32, height: u32) -> f64 {
        (width as f64 / self.link_divisor) * (height as f64 / self.link_divisor)
    }
}
