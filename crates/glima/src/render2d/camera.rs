//! 2D camera: world-to-clip transform, screen-to-world unprojection, and
//! view culling.
//!
//! The camera is an orthographic projection centered on `position` and
//! scaled by `zoom` (2.0 means everything appears twice as large). The
//! matrix is rebuilt lazily: setters mark it dirty and `view_proj()`
//! recomputes only when something changed since the last call.

use glam::{Mat4, Vec2};

use super::glyph::Rect;

/// Orthographic 2D camera.
pub struct Camera2d {
    position: Vec2,
    zoom: f32,
    viewport: Vec2,
    matrix: Mat4,
    dirty: bool,
}

impl Camera2d {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport: Vec2::new(viewport_width, viewport_height),
            matrix: Mat4::IDENTITY,
            dirty: true,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        if position != self.position {
            self.position = position;
            self.dirty = true;
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor. Values are clamped to a small positive minimum
    /// so the projection never degenerates.
    pub fn set_zoom(&mut self, zoom: f32) {
        let zoom = zoom.max(1e-4);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.dirty = true;
        }
    }

    /// Update the viewport size (call on window resize).
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        let viewport = Vec2::new(width, height);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.dirty = true;
        }
    }

    /// The current view-projection matrix, rebuilt only if a setter ran
    /// since the last call.
    pub fn view_proj(&mut self) -> Mat4 {
        if self.dirty {
            let half = self.viewport / (2.0 * self.zoom);
            let proj = Mat4::orthographic_rh(
                self.position.x - half.x,
                self.position.x + half.x,
                self.position.y - half.y,
                self.position.y + half.y,
                -1.0,
                1.0,
            );
            self.matrix = proj;
            self.dirty = false;
        }
        self.matrix
    }

    /// Convert a screen-space point (pixels, origin top-left, y down) into
    /// world coordinates under the current camera.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        // Center the point and flip y to match world-space (y up).
        let mut p = screen - self.viewport * 0.5;
        p.y = -p.y;
        p / self.zoom + self.position
    }

    /// Whether an axis-aligned box intersects the visible world rectangle.
    /// Used to skip drawing off-screen sprites.
    pub fn is_box_in_view(&self, dest: Rect) -> bool {
        let half = self.viewport / (2.0 * self.zoom);
        let min = self.position - half;
        let max = self.position + half;
        dest.x < max.x && dest.x + dest.w > min.x && dest.y < max.y && dest.y + dest.h > min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_of(camera: &mut Camera2d, clip_expected: Vec2, world: Vec2) {
        let clip = camera.view_proj() * glam::Vec4::new(world.x, world.y, 0.0, 1.0);
        assert!(
            (clip.x - clip_expected.x).abs() < 1e-5 && (clip.y - clip_expected.y).abs() < 1e-5,
            "world {world:?} mapped to clip ({}, {}), expected {clip_expected:?}",
            clip.x,
            clip.y
        );
    }

    #[test]
    fn camera_center_maps_to_clip_origin() {
        let mut camera = Camera2d::new(800.0, 600.0);
        camera.set_position(Vec2::new(100.0, -40.0));
        world_of(&mut camera, Vec2::ZERO, Vec2::new(100.0, -40.0));
    }

    #[test]
    fn viewport_edges_map_to_clip_edges() {
        let mut camera = Camera2d::new(800.0, 600.0);
        // Right edge of the view is +400 world units from center at zoom 1.
        world_of(&mut camera, Vec2::new(1.0, 0.0), Vec2::new(400.0, 0.0));
        world_of(&mut camera, Vec2::new(0.0, 1.0), Vec2::new(0.0, 300.0));
    }

    #[test]
    fn zoom_scales_visible_extent() {
        let mut camera = Camera2d::new(800.0, 600.0);
        camera.set_zoom(2.0);
        // At zoom 2, +200 world units reaches the right clip edge.
        world_of(&mut camera, Vec2::new(1.0, 0.0), Vec2::new(200.0, 0.0));
    }

    #[test]
    fn screen_to_world_round_trip() {
        let mut camera = Camera2d::new(800.0, 600.0);
        camera.set_position(Vec2::new(50.0, 20.0));
        camera.set_zoom(2.0);

        // Screen center is the camera position.
        let center = camera.screen_to_world(Vec2::new(400.0, 300.0));
        assert!((center - Vec2::new(50.0, 20.0)).length() < 1e-4);

        // Top-left of the screen is up and to the left in world space.
        let corner = camera.screen_to_world(Vec2::ZERO);
        assert!(corner.x < center.x);
        assert!(corner.y > center.y);
    }

    #[test]
    fn culling_accepts_visible_and_rejects_far_boxes() {
        let mut camera = Camera2d::new(800.0, 600.0);
        camera.set_position(Vec2::ZERO);

        assert!(camera.is_box_in_view(Rect::new(-10.0, -10.0, 20.0, 20.0)));
        // Straddling the right edge still counts as visible.
        assert!(camera.is_box_in_view(Rect::new(390.0, 0.0, 50.0, 50.0)));
        assert!(!camera.is_box_in_view(Rect::new(500.0, 0.0, 50.0, 50.0)));
        assert!(!camera.is_box_in_view(Rect::new(0.0, -400.0, 50.0, 50.0)));
    }

    #[test]
    fn matrix_rebuild_only_when_dirty() {
        let mut camera = Camera2d::new(800.0, 600.0);
        let a = camera.view_proj();
        // Setting the same values keeps the cached matrix bit-identical.
        camera.set_position(Vec2::ZERO);
        camera.set_zoom(1.0);
        let b = camera.view_proj();
        assert_eq!(a, b);

        camera.set_position(Vec2::new(1.0, 0.0));
        let c = camera.view_proj();
        assert_ne!(a, c);
    }
}
