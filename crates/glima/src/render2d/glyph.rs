//! Glyph — one quad submission.
//!
//! A [`Glyph`] holds the four precomputed corner vertices of a textured
//! quad, plus the texture handle and a depth value used only for sorting.
//! Corners are always produced in the same order (top-left, bottom-left,
//! bottom-right, top-right) so the triangulation (TL, BL, BR) + (BR, TR, TL)
//! is consistent regardless of which constructor built the glyph.

use glam::Vec2;

use super::texture::TextureHandle;
use super::vertex::SpriteVertex;
use super::Color;

/// An axis-aligned rectangle given as origin + extent.
///
/// Used both for destination rectangles (world units, origin at the
/// bottom-left corner) and UV rectangles (normalized texture space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// The full texture, (0,0) to (1,1). The default UV rect.
    pub const FULL_UV: Self = Self { x: 0.0, y: 0.0, w: 1.0, h: 1.0 };

    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// One quad queued for rendering: four corner vertices, a texture, and a
/// sort depth. Owned by the [`SpriteBatch`](super::SpriteBatch) that created
/// it for the duration of one frame.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub top_left: SpriteVertex,
    pub bottom_left: SpriteVertex,
    pub bottom_right: SpriteVertex,
    pub top_right: SpriteVertex,
    pub texture: TextureHandle,
    pub depth: f32,
}

impl Glyph {
    /// Build an axis-aligned glyph. The destination rect's origin is its
    /// bottom-left corner; UVs mirror the corner ordering. Pure: identical
    /// inputs always yield identical vertices.
    pub fn new(dest: Rect, uv: Rect, texture: TextureHandle, depth: f32, color: Color) -> Self {
        let color = color.to_array();
        Self {
            top_left: SpriteVertex {
                position: [dest.x, dest.y + dest.h],
                uv: [uv.x, uv.y + uv.h],
                color,
            },
            bottom_left: SpriteVertex {
                position: [dest.x, dest.y],
                uv: [uv.x, uv.y],
                color,
            },
            bottom_right: SpriteVertex {
                position: [dest.x + dest.w, dest.y],
                uv: [uv.x + uv.w, uv.y],
                color,
            },
            top_right: SpriteVertex {
                position: [dest.x + dest.w, dest.y + dest.h],
                uv: [uv.x + uv.w, uv.y + uv.h],
                color,
            },
            texture,
            depth,
        }
    }

    /// Build a glyph rotated by `angle` radians around the quad's center.
    ///
    /// Corners are computed centered at the origin, rotated, translated back
    /// by the half-dimensions, and offset by the destination position.
    pub fn rotated(
        dest: Rect,
        uv: Rect,
        texture: TextureHandle,
        depth: f32,
        color: Color,
        angle: f32,
    ) -> Self {
        let half = Vec2::new(dest.w * 0.5, dest.h * 0.5);

        let tl = rotate_point(Vec2::new(-half.x, half.y), angle) + half;
        let bl = rotate_point(Vec2::new(-half.x, -half.y), angle) + half;
        let br = rotate_point(Vec2::new(half.x, -half.y), angle) + half;
        let tr = rotate_point(Vec2::new(half.x, half.y), angle) + half;

        let color = color.to_array();
        Self {
            top_left: SpriteVertex {
                position: [dest.x + tl.x, dest.y + tl.y],
                uv: [uv.x, uv.y + uv.h],
                color,
            },
            bottom_left: SpriteVertex {
                position: [dest.x + bl.x, dest.y + bl.y],
                uv: [uv.x, uv.y],
                color,
            },
            bottom_right: SpriteVertex {
                position: [dest.x + br.x, dest.y + br.y],
                uv: [uv.x + uv.w, uv.y],
                color,
            },
            top_right: SpriteVertex {
                position: [dest.x + tr.x, dest.y + tr.y],
                uv: [uv.x + uv.w, uv.y + uv.h],
                color,
            },
            texture,
            depth,
        }
    }

    /// Build a glyph rotated to face `dir`.
    ///
    /// The angle is measured from the +X axis, negative when `dir.y < 0`,
    /// giving a signed angle in [-π, π]. The direction is normalized first
    /// so non-unit inputs are safe; a zero-length direction falls back to
    /// angle 0.
    pub fn with_direction(
        dest: Rect,
        uv: Rect,
        texture: TextureHandle,
        depth: f32,
        color: Color,
        dir: Vec2,
    ) -> Self {
        Self::rotated(dest, uv, texture, depth, color, direction_angle(dir))
    }
}

/// Signed angle between the +X axis and `dir`, in [-π, π]. Zero for a
/// zero-length direction.
pub(crate) fn direction_angle(dir: Vec2) -> f32 {
    let dir = dir.normalize_or_zero();
    if dir == Vec2::ZERO {
        return 0.0;
    }
    let angle = dir.x.clamp(-1.0, 1.0).acos();
    if dir.y < 0.0 { -angle } else { angle }
}

/// Standard 2D rotation of `pos` by `angle` radians around the origin.
fn rotate_point(pos: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(pos.x * cos - pos.y * sin, pos.x * sin + pos.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEX: TextureHandle = TextureHandle(1);
    const EPS: f32 = 1e-5;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < EPS && (a[1] - b[1]).abs() < EPS
    }

    #[test]
    fn axis_aligned_corners() {
        let g = Glyph::new(
            Rect::new(10.0, 20.0, 30.0, 40.0),
            Rect::FULL_UV,
            TEX,
            0.0,
            Color::WHITE,
        );
        assert_eq!(g.top_left.position, [10.0, 60.0]);
        assert_eq!(g.bottom_left.position, [10.0, 20.0]);
        assert_eq!(g.bottom_right.position, [40.0, 20.0]);
        assert_eq!(g.top_right.position, [40.0, 60.0]);
        // UVs mirror the corner ordering
        assert_eq!(g.top_left.uv, [0.0, 1.0]);
        assert_eq!(g.bottom_left.uv, [0.0, 0.0]);
        assert_eq!(g.bottom_right.uv, [1.0, 0.0]);
        assert_eq!(g.top_right.uv, [1.0, 1.0]);
    }

    #[test]
    fn axis_aligned_is_pure() {
        let dest = Rect::new(-3.0, 7.5, 12.0, 8.0);
        let uv = Rect::new(0.25, 0.25, 0.5, 0.5);
        let a = Glyph::new(dest, uv, TEX, 2.0, Color::RED);
        let b = Glyph::new(dest, uv, TEX, 2.0, Color::RED);
        assert_eq!(a.top_left, b.top_left);
        assert_eq!(a.bottom_left, b.bottom_left);
        assert_eq!(a.bottom_right, b.bottom_right);
        assert_eq!(a.top_right, b.top_right);
    }

    #[test]
    fn zero_rotation_matches_axis_aligned() {
        let dest = Rect::new(5.0, -2.0, 16.0, 9.0);
        let uv = Rect::FULL_UV;
        let plain = Glyph::new(dest, uv, TEX, 0.0, Color::WHITE);
        let rotated = Glyph::rotated(dest, uv, TEX, 0.0, Color::WHITE, 0.0);
        assert!(close(plain.top_left.position, rotated.top_left.position));
        assert!(close(plain.bottom_left.position, rotated.bottom_left.position));
        assert!(close(plain.bottom_right.position, rotated.bottom_right.position));
        assert!(close(plain.top_right.position, rotated.top_right.position));
    }

    #[test]
    fn half_turn_swaps_opposite_corners() {
        let dest = Rect::new(0.0, 0.0, 10.0, 4.0);
        let g = Glyph::rotated(dest, Rect::FULL_UV, TEX, 0.0, Color::WHITE, std::f32::consts::PI);
        let plain = Glyph::new(dest, Rect::FULL_UV, TEX, 0.0, Color::WHITE);
        assert!(close(g.top_left.position, plain.bottom_right.position));
        assert!(close(g.bottom_right.position, plain.top_left.position));
    }

    #[test]
    fn direction_angle_sign_convention() {
        assert!((direction_angle(Vec2::new(1.0, 0.0))).abs() < EPS);
        assert!((direction_angle(Vec2::new(0.0, 1.0)) - std::f32::consts::FRAC_PI_2).abs() < EPS);
        assert!((direction_angle(Vec2::new(0.0, -1.0)) + std::f32::consts::FRAC_PI_2).abs() < EPS);
        // Non-unit input is normalized, not trusted
        assert!((direction_angle(Vec2::new(5.0, 0.0))).abs() < EPS);
        // Degenerate input falls back to zero instead of NaN
        assert_eq!(direction_angle(Vec2::ZERO), 0.0);
    }

    #[test]
    fn color_applied_to_all_corners() {
        let g = Glyph::new(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Rect::FULL_UV,
            TEX,
            0.0,
            Color::rgba(10, 20, 30, 40),
        );
        for v in [&g.top_left, &g.bottom_left, &g.bottom_right, &g.top_right] {
            assert_eq!(v.color, [10, 20, 30, 40]);
        }
    }
}
