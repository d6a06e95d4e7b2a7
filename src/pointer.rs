// Cursor position as seen by the particle field. Written by the mouse
// listeners, read once per frame by the tick.

use glm::DVec2;

#[derive(Clone, Debug, PartialEq)]
pub struct PointerState {
    pub position: Option<DVec2>,
    pub radius: f64,
}

impl PointerState {
    pub fn new(radius: f64) -> Self {
        PointerState {
            position: None,
            radius,
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.position = Some(glm::vec2(x, y));
    }

    pub fn clear(&mut self) {
        self.position = None;
    }

    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }

    pub fn distance_to(&self, point: &DVec2) -> Option<f64> {
        self.position.map(|p| glm::distance(&p, point))
    }

    // True when the pointer is present and strictly inside its radius of `point`
    pub fn influences(&self, point: &DVec2) -> bool {
        match self.distance_to(point) {
            Some(distance) => distance < self.radius,
            None => false,
        }
    }
}
