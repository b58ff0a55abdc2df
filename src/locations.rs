//! Location coordinates for map-data export.
//!
//! This is presentation-boundary data, not scoring input. Locations outside
//! the fixed table map to the `[0.0, 0.0]` sentinel rather than failing:
//! a winner with an unplotted endpoint still appears in the export, and the
//! consumer decides how to render the sentinel.

/// `[latitude, longitude]` of the origin/destination labels the simulator
/// and the trained model know about.
static COORDINATES: &[(&str, [f64; 2])] = &[
    ("Mexico", [23.6345, -102.5528]),
    ("Chile", [-35.6751, -71.5430]),
    ("China", [35.8617, 104.1954]),
    ("Germany", [51.1657, 10.4515]),
    ("India", [20.5937, 78.9629]),
    ("Canada", [56.1304, -106.3468]),
];

/// Display color per transport mode; unknown modes render black.
static MODE_COLORS: &[(&str, &str)] = &[
    ("air", "#1f77b4"),
    ("sea", "#2ca02c"),
    ("land", "#d62728"),
];

/// Sentinel returned for locations with no known coordinates.
pub const UNKNOWN_LOCATION: [f64; 2] = [0.0, 0.0];

pub fn coordinates_for(location: &str) -> [f64; 2] {
    COORDINATES
        .iter()
        .find(|(name, _)| *name == location)
        .map(|(_, coords)| *coords)
        .unwrap_or(UNKNOWN_LOCATION)
}

pub fn color_for_mode(mode: &str) -> &'static str {
    MODE_COLORS
        .iter()
        .find(|(name, _)| *name == mode)
        .map(|(_, color)| *color)
        .unwrap_or("#000000")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_location() {
        assert_eq!(coordinates_for("Chile"), [-35.6751, -71.5430]);
    }

    #[test]
    fn test_unknown_location_uses_sentinel() {
        assert_eq!(coordinates_for("Atlantis"), UNKNOWN_LOCATION);
    }

    #[test]
    fn test_mode_colors() {
        assert_eq!(color_for_mode("air"), "#1f77b4");
        assert_eq!(color_for_mode("teleport"), "#000000");
    }
}
