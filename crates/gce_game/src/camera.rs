use glam::Vec2;

/// Side-scrolling view into the level. `position` is the world coordinate of
/// the viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport,
        }
    }

    /// Centre the view on a box, then clamp into `[0, level - viewport]` per
    /// axis. A level smaller than the viewport pins that axis to 0.
    pub fn follow(&mut self, target_pos: Vec2, target_size: Vec2, level_size: Vec2) {
        let target = target_pos + target_size * 0.5 - self.viewport * 0.5;
        let max = (level_size - self.viewport).max(Vec2::ZERO);
        self.position = target.clamp(Vec2::ZERO, max);
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }

    /// Whether any part of a box falls inside the viewport.
    pub fn is_visible(&self, pos: Vec2, size: Vec2) -> bool {
        crate::body::aabb_overlap(pos, size, self.position, self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_centres_on_target() {
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        camera.follow(
            Vec2::new(1000.0, 500.0),
            Vec2::new(32.0, 48.0),
            Vec2::new(4000.0, 2000.0),
        );
        assert_eq!(camera.position, Vec2::new(616.0, 224.0));
    }

    #[test]
    fn follow_clamps_to_level_edges() {
        let level = Vec2::new(2000.0, 640.0);
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));

        camera.follow(Vec2::new(10.0, 10.0), Vec2::splat(32.0), level);
        assert_eq!(camera.position, Vec2::ZERO);

        camera.follow(Vec2::new(1990.0, 600.0), Vec2::splat(32.0), level);
        assert_eq!(camera.position, Vec2::new(1200.0, 40.0));
    }

    #[test]
    fn small_level_pins_camera() {
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        camera.follow(Vec2::new(300.0, 200.0), Vec2::splat(32.0), Vec2::new(400.0, 300.0));
        assert_eq!(camera.position, Vec2::ZERO);
    }

    #[test]
    fn screen_space_and_visibility() {
        let mut camera = Camera::new(Vec2::new(100.0, 100.0));
        camera.position = Vec2::new(50.0, 0.0);
        assert_eq!(camera.to_screen(Vec2::new(60.0, 10.0)), Vec2::new(10.0, 10.0));
        assert!(camera.is_visible(Vec2::new(140.0, 0.0), Vec2::splat(16.0)));
        assert!(!camera.is_visible(Vec2::new(150.0, 0.0), Vec2::splat(16.0)));
    }
}
