// Orthographic camera that keeps a fixed scene rectangle in view

use glam::{Mat4, Vec2};

/// 2D camera framing a scene of known size
#[derive(Debug, Clone)]
pub struct Camera {
    /// Scene point shown at the window centre
    center: Vec2,
    /// Scene extents that must stay visible
    scene_size: Vec2,
    /// Fraction of the window the scene may occupy
    margin: f32,
    /// Viewport size in physical pixels
    viewport: Vec2,
    /// View-projection matrix
    view_proj: Mat4,
}

impl Camera {
    /// Create a camera framing `scene_size` in a viewport of the given size
    pub fn new(scene_size: Vec2, viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            center: Vec2::ZERO,
            scene_size,
            margin: 0.95,
            viewport: Vec2::new(viewport_width, viewport_height),
            view_proj: Mat4::IDENTITY,
        };
        camera.update_view_proj();
        camera
    }

    /// Pixels per scene unit, chosen so the whole scene fits the viewport
    pub fn zoom(&self) -> f32 {
        let fit = self.viewport / self.scene_size;
        (fit.x.min(fit.y) * self.margin).max(f32::EPSILON)
    }

    /// Half the visible area in scene units
    fn half_extents(&self) -> Vec2 {
        self.viewport / (2.0 * self.zoom())
    }

    fn update_view_proj(&mut self) {
        let half = self.half_extents();
        self.view_proj = Mat4::orthographic_rh(
            self.center.x - half.x,
            self.center.x + half.x,
            self.center.y - half.y,
            self.center.y + half.y,
            -1.0,
            1.0,
        );
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.update_view_proj();
    }

    /// Get the view-projection matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.view_proj
    }

    /// Convert window pixel coordinates (origin top-left) to scene coordinates
    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        let half = self.half_extents();
        let normalized = Vec2::new(
            (screen_pos.x / self.viewport.x) * 2.0 - 1.0,
            1.0 - (screen_pos.y / self.viewport.y) * 2.0,
        );
        self.center + normalized * half
    }
}
