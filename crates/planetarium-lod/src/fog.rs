/// Multiplier at or below the minimum height.
pub const FOG_MULTIPLIER_MAX: f32 = 6.0;

/// Fog density multiplier for a viewer `distance` from the planet centre.
///
/// Full strength at `min_height`, fading linearly to zero at `max_height`.
/// A degenerate band (`max_height <= min_height`) is a hard step at `min_height`.
pub fn atmosphere_fog_multiplier(distance: f32, min_height: f32, max_height: f32) -> f32 {
    let span = max_height - min_height;
    if span <= 0.0 {
        return if distance <= min_height { FOG_MULTIPLIER_MAX } else { 0.0 };
    }
    (1.0 - (distance - min_height) / span).clamp(0.0, 1.0) * FOG_MULTIPLIER_MAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_fog_below_band() {
        assert_eq!(atmosphere_fog_multiplier(50.0, 100.0, 200.0), 6.0);
        assert_eq!(atmosphere_fog_multiplier(100.0, 100.0, 200.0), 6.0);
    }

    #[test]
    fn test_no_fog_above_band() {
        assert_eq!(atmosphere_fog_multiplier(200.0, 100.0, 200.0), 0.0);
        assert_eq!(atmosphere_fog_multiplier(1e9, 100.0, 200.0), 0.0);
    }

    #[test]
    fn test_linear_midpoint() {
        assert!((atmosphere_fog_multiplier(150.0, 100.0, 200.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_band() {
        assert_eq!(atmosphere_fog_multiplier(10.0, 10.0, 10.0), 6.0);
        assert_eq!(atmosphere_fog_multiplier(11.0, 10.0, 10.0), 0.0);
    }
}
