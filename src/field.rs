// The particle field: owns the particle set, the pointer and the canvas size,
// and knows how to advance and draw one frame onto any `Surface`.

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::pointer::PointerState;
use crate::surface::Surface;
use rand::rngs::StdRng;
use rand::SeedableRng;

// A connecting line between two particles, `from < to`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link {
    pub from: usize,
    pub to: usize,
    pub alpha: f64,
    // The `from` particle is within the pointer's radius.
    pub hot: bool,
}

pub struct ParticleField {
    width: u32,
    height: u32,
    particles: Vec<Particle>,
    pointer: PointerState,
    config: FieldConfig,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(width: u32, height: u32, config: FieldConfig) -> Result<Self, String> {
        Self::with_rng(width, height, config, StdRng::from_entropy())
    }

    // Same as `new` but reproducible, every rebuild draws from the seeded generator.
    pub fn with_seed(
        width: u32,
        height: u32,
        config: FieldConfig,
        seed: u64,
    ) -> Result<Self, String> {
        Self::with_rng(width, height, config, StdRng::seed_from_u64(seed))
    }

    pub fn from_particles(
        width: u32,
        height: u32,
        config: FieldConfig,
        particles: Vec<Particle>,
    ) -> Result<Self, String> {
        config.validate()?;
        Ok(ParticleField {
            width,
            height,
            particles,
            pointer: PointerState::new(config.pointer_radius),
            config,
            rng: StdRng::from_entropy(),
        })
    }

    fn with_rng(width: u32, height: u32, config: FieldConfig, rng: StdRng) -> Result<Self, String> {
        config.validate()?;
        let mut field = ParticleField {
            width,
            height,
            particles: Vec::new(),
            pointer: PointerState::new(config.pointer_radius),
            config,
            rng,
        };
        field.populate();
        Ok(field)
    }

    // Throws away the current set, count is derived from the canvas area only
    fn populate(&mut self) {
        let count = self.config.particle_count(self.width, self.height);
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let p = Particle::random(&mut self.rng, self.width, self.height, &self.config);
            self.particles.push(p);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.populate();
        log::debug!(
            "particle field resized to {}x{}, {} particles",
            width,
            height,
            self.particles.len()
        );
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer.move_to(x, y);
    }

    pub fn clear_pointer(&mut self) {
        self.pointer.clear();
    }

    // Advance every particle by one frame without drawing.
    pub fn step(&mut self) {
        let (width, height) = (self.width as f64, self.height as f64);
        let force = self.config.repulsion_force;
        for particle in &mut self.particles {
            particle.update(width, height, &self.pointer, force);
        }
    }

    // Links between the current particle positions. O(n²) over unordered pairs.
    pub fn links(&self) -> Vec<Link> {
        let threshold = self.config.link_threshold_sq(self.width, self.height);
        let mut links = Vec::new();
        for (a, first) in self.particles.iter().enumerate() {
            let hot = self.pointer.influences(&first.pos);
            for (b, second) in self.particles.iter().enumerate().skip(a + 1) {
                let delta = first.pos - second.pos;
                let distance_sq = delta.dot(&delta);
                if distance_sq >= threshold {
                    continue;
                }
                let alpha = 1.0 - distance_sq / self.config.link_falloff;
                if alpha <= 0.0 {
                    continue;
                }
                links.push(Link {
                    from: a,
                    to: b,
                    alpha,
                    hot,
                });
            }
        }
        links
    }

    // Draw one frame: clear, move and draw each particle, then draw the links.
    pub fn render<S: Surface>(&mut self, surface: &mut S) -> Result<(), S::Error> {
        let (width, height) = (self.width as f64, self.height as f64);
        surface.clear(width, height, self.config.background)?;

        let force = self.config.repulsion_force;
        for particle in &mut self.particles {
            particle.update(width, height, &self.pointer, force);
            surface.fill_circle(
                &particle.pos,
                particle.radius,
                particle.color,
                self.config.particle_alpha,
            )?;
        }

        for link in self.links() {
            let color = if link.hot {
                self.config.link_color_hot
            } else {
                self.config.link_color_cool
            };
            surface.stroke_line(
                &self.particles[link.from].pos,
                &self.particles[link.to].pos,
                self.config.link_width,
                color,
                link.alpha,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use glm::DVec2;
    use std::convert::Infallible;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear(Color),
        Circle(DVec2, f64),
        Line(DVec2, DVec2, Color, f64),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Surface for Recorder {
        type Error = Infallible;

        fn clear(&mut self, _width: f64, _height: f64, color: Color) -> Result<(), Infallible> {
            self.ops.push(Op::Clear(color));
            Ok(())
        }

        fn fill_circle(
            &mut self,
            center: &DVec2,
            radius: f64,
            _color: Color,
            _alpha: f64,
        ) -> Result<(), Infallible> {
            self.ops.push(Op::Circle(*center, radius));
            Ok(())
        }

        fn stroke_line(
            &mut self,
            from: &DVec2,
            to: &DVec2,
            _width: f64,
            color: Color,
            alpha: f64,
        ) -> Result<(), Infallible> {
            self.ops.push(Op::Line(*from, *to, color, alpha));
            Ok(())
        }
    }

    fn dot(x: f64, y: f64) -> Particle {
        Particle::new(x, y, 0.1, -0.1, 2.0, Color::WHITE)
    }

    fn in_bounds(field: &ParticleField) -> bool {
        let (w, h) = (field.width() as f64, field.height() as f64);
        field
            .particles()
            .iter()
            .all(|p| p.pos.x >= 0.0 && p.pos.x <= w && p.pos.y >= 0.0 && p.pos.y <= h)
    }

    #[test]
    fn count_tracks_canvas_area_across_resizes() {
        let mut field = ParticleField::with_seed(800, 600, FieldConfig::default(), 1).unwrap();
        assert_eq!(field.particles().len(), 53);

        for &(w, h) in &[(1920, 1080), (375, 812), (50, 50), (1280, 720), (0, 0)] {
            field.resize(w, h);
            assert_eq!(field.particles().len(), (w * h / 9000) as usize);
            assert_eq!((field.width(), field.height()), (w, h));
            assert!(in_bounds(&field));
        }
    }

    #[test]
    fn resize_rebuilds_the_set() {
        let mut field = ParticleField::with_seed(800, 600, FieldConfig::default(), 2).unwrap();
        let before = field.particles().to_vec();
        field.resize(800, 600);
        assert_eq!(field.particles().len(), before.len());
        assert_ne!(field.particles(), &before[..]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = FieldConfig::default();
        config.link_falloff = -1.0;
        assert!(ParticleField::new(800, 600, config.clone()).is_err());
        assert!(ParticleField::from_particles(800, 600, config, vec![]).is_err());
    }

    #[test]
    fn particles_stay_on_canvas() {
        let mut field = ParticleField::with_seed(640, 480, FieldConfig::default(), 3).unwrap();
        for tick in 0..3000 {
            match tick % 500 {
                0 => field.set_pointer(0.0, 0.0),
                100 => field.set_pointer(320.0, 240.0),
                200 => field.set_pointer(640.0, 480.0),
                300 => field.clear_pointer(),
                _ => {}
            }
            field.step();
            assert!(in_bounds(&field), "escaped on tick {}", tick);
        }
    }

    #[test]
    fn no_pointer_means_pure_velocity() {
        let particles = vec![dot(200.0, 200.0), dot(400.0, 300.0), dot(600.0, 100.0)];
        let mut field =
            ParticleField::from_particles(800, 600, FieldConfig::default(), particles.clone())
                .unwrap();
        field.step();
        for (before, after) in particles.iter().zip(field.particles()) {
            let delta = after.pos - before.pos;
            assert!(glm::distance(&delta, &before.vel) < 1e-9);
        }
    }

    #[test]
    fn pointer_on_particle_moves_it_five_pixels() {
        let p = Particle::new(300.0, 300.0, 0.0, 0.0, 2.0, Color::WHITE);
        let mut field =
            ParticleField::from_particles(800, 600, FieldConfig::default(), vec![p]).unwrap();
        field.set_pointer(300.0, 300.0);
        field.step();
        let moved = glm::distance(&field.particles()[0].pos, &p.pos);
        assert!((moved - 5.0).abs() < 1e-9);
    }

    #[test]
    fn links_respect_threshold_and_falloff() {
        // threshold for 800x600 is (800/7)*(600/7) ≈ 9795.9
        let particles = vec![
            dot(100.0, 100.0),
            dot(150.0, 100.0),
            dot(240.0, 100.0),
            dot(500.0, 500.0),
        ];
        let field =
            ParticleField::from_particles(800, 600, FieldConfig::default(), particles).unwrap();
        let links = field.links();
        assert_eq!(links.len(), 2);

        assert_eq!((links[0].from, links[0].to), (0, 1));
        assert!((links[0].alpha - (1.0 - 2500.0 / 20000.0)).abs() < 1e-12);
        assert!(!links[0].hot);

        // 90px apart: 8100 < threshold
        assert_eq!((links[1].from, links[1].to), (1, 2));
        assert!((links[1].alpha - (1.0 - 8100.0 / 20000.0)).abs() < 1e-12);
    }

    #[test]
    fn faded_links_are_skipped_on_large_canvases() {
        // threshold for 2100x2100 is 90000, well past the falloff
        let particles = vec![dot(100.0, 100.0), dot(250.0, 100.0), dot(200.0, 100.0)];
        let field =
            ParticleField::from_particles(2100, 2100, FieldConfig::default(), particles).unwrap();
        let pairs: Vec<(usize, usize)> = field.links().iter().map(|l| (l.from, l.to)).collect();
        // 0-1 is 150px apart (22500 > 20000)
        assert_eq!(pairs, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn hot_links_follow_the_first_particle() {
        let particles = vec![
            dot(100.0, 100.0),
            dot(150.0, 100.0),
            dot(500.0, 100.0),
            dot(550.0, 100.0),
        ];
        let mut field =
            ParticleField::from_particles(800, 600, FieldConfig::default(), particles).unwrap();
        field.set_pointer(0.0, 100.0);
        let links = field.links();
        assert_eq!(links.len(), 2);
        assert!(links[0].hot);
        assert!(!links[1].hot);

        field.clear_pointer();
        assert!(field.links().iter().all(|l| !l.hot));
    }

    #[test]
    fn render_clears_then_draws_particles_then_links() {
        let particles = vec![dot(100.0, 100.0), dot(150.0, 100.0), dot(700.0, 500.0)];
        let mut field =
            ParticleField::from_particles(800, 600, FieldConfig::default(), particles).unwrap();
        let mut surface = Recorder::default();
        field.render(&mut surface).unwrap();

        let config = FieldConfig::default();
        assert_eq!(surface.ops[0], Op::Clear(Color::WHITE));
        for (op, p) in surface.ops[1..4].iter().zip(field.particles()) {
            assert_eq!(*op, Op::Circle(p.pos, p.radius));
        }
        assert_eq!(surface.ops.len(), 5);
        match &surface.ops[4] {
            Op::Line(from, to, color, alpha) => {
                assert_eq!(*from, field.particles()[0].pos);
                assert_eq!(*to, field.particles()[1].pos);
                assert_eq!(*color, config.link_color_cool);
                assert!(*alpha > 0.8);
            }
            other => panic!("expected a line, got {:?}", other),
        }
    }

    #[test]
    fn render_uses_hot_color_near_pointer() {
        let particles = vec![dot(100.0, 100.0), dot(150.0, 100.0)];
        let mut field =
            ParticleField::from_particles(800, 600, FieldConfig::default(), particles).unwrap();
        field.set_pointer(250.0, 100.0);
        let mut surface = Recorder::default();
        field.render(&mut surface).unwrap();
        let hot = FieldConfig::default().link_color_hot;
        assert!(surface
            .ops
            .iter()
            .any(|op| matches!(op, Op::Line(_, _, color, _) if *color == hot)));
    }
}
