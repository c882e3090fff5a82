use super::geometry::{Aabb, Vec3};

/// Longest axis of the organ model after normalization, in world units.
pub const ORGAN_LONGEST_AXIS: f32 = 3.0;

/// Centers the model at the origin and scales it uniformly so its longest
/// axis spans [`ORGAN_LONGEST_AXIS`]. Returns `None` for degenerate input.
pub fn normalize_model_bounds(raw: Aabb) -> Option<Aabb> {
    if !raw.min.is_finite() || !raw.max.is_finite() {
        return None;
    }
    let size = raw.size();
    let longest = size.max_component();
    if longest <= 0.0 {
        return None;
    }
    let scale = ORGAN_LONGEST_AXIS / longest;
    let half = size * (0.5 * scale);
    Some(Aabb::new(Vec3::ZERO - half, half))
}

pub fn normalize_model_vertices<I>(vertices: I) -> Option<Aabb>
where
    I: IntoIterator<Item = Vec3>,
{
    Aabb::from_points(vertices).and_then(normalize_model_bounds)
}

/// Bounds for a model whose raw dimensions are known but whose vertices are
/// not loaded.
pub fn bounds_from_extents(extents: Vec3) -> Option<Aabb> {
    if extents.x < 0.0 || extents.y < 0.0 || extents.z < 0.0 {
        return None;
    }
    normalize_model_bounds(Aabb::new(Vec3::ZERO, extents))
}
