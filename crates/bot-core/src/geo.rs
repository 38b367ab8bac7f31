//! World-space geometry helpers.
//!
//! Positions are `glam::Vec3` in world units with **+Z up**.  Angles are in
//! degrees: yaw 0 points along +X and grows counter-clockwise toward +Y,
//! matching the view angles the host reports for agent bodies.

pub use glam::{Vec2, Vec3};

/// Drop the vertical component.
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}

/// Distance in the ground plane, ignoring height.
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(b - a).length()
}

/// Wrap an angle into `(-180, 180]`.
pub fn normalize_angle(deg: f32) -> f32 {
    let mut a = deg % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
#[inline]
pub fn angle_diff(to: f32, from: f32) -> f32 {
    normalize_angle(to - from)
}

/// Yaw (degrees) of the horizontal direction from `from` to `to`.
#[inline]
pub fn yaw_towards(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}

/// Pitch (degrees, positive = up) of the direction from `from` to `to`.
#[inline]
pub fn pitch_towards(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    let flat = (d.x * d.x + d.y * d.y).sqrt();
    d.z.atan2(flat).to_degrees()
}

/// Unit horizontal direction for a yaw angle.
#[inline]
pub fn dir_from_yaw(yaw_deg: f32) -> Vec3 {
    let r = yaw_deg.to_radians();
    Vec3::new(r.cos(), r.sin(), 0.0)
}

/// Unit direction for a yaw/pitch pair.
#[inline]
pub fn dir_from_angles(yaw_deg: f32, pitch_deg: f32) -> Vec3 {
    let (y, p) = (yaw_deg.to_radians(), pitch_deg.to_radians());
    Vec3::new(p.cos() * y.cos(), p.cos() * y.sin(), p.sin())
}

/// Unit horizontal vector 90° counter-clockwise from `dir` (agent's left).
#[inline]
pub fn left_of(dir: Vec3) -> Vec3 {
    Vec3::new(-dir.y, dir.x, 0.0).normalize_or_zero()
}

/// `true` if `target` lies within a horizontal cone of total angle `fov_deg`
/// centred on `view_yaw` as seen from `eye`.
pub fn in_field_of_view(eye: Vec3, view_yaw: f32, target: Vec3, fov_deg: f32) -> bool {
    if horizontal_distance(eye, target) < 1e-3 {
        return true;
    }
    angle_diff(yaw_towards(eye, target), view_yaw).abs() <= fov_deg * 0.5
}

/// Closest point to `p` on segment `a..b`.
pub fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}
