use nalgebra::Vector3;

/// Velocity of the moving-air frame for a compass-bearing wind.
///
/// `direction_deg` is the bearing the air moves toward, using the same
/// convention as the launch azimuth: 0° blows along +z, 90° along +x.
/// Wind never has a vertical component.
pub fn wind_vector(speed_mps: f64, direction_deg: f64) -> Vector3<f64> {
    if speed_mps == 0.0 {
        return Vector3::zeros();
    }

    let direction_rad = direction_deg.to_radians();
    Vector3::new(
        speed_mps * direction_rad.sin(),
        0.0,
        speed_mps * direction_rad.cos(),
    )
}
