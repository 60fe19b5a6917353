use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Position of a point relative to a polygon
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeoPosition {
    Exterior,
    /// Within a millimeter of one of the polygon's edges
    Boundary,
    Interior,
}

impl GeoPosition {
    /// Interior or boundary
    pub fn is_inside(&self) -> bool {
        matches!(self, GeoPosition::Interior | GeoPosition::Boundary)
    }
}

/// The 8 principal compass directions, in clockwise order starting at north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassDirection {
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::N,
        CompassDirection::NE,
        CompassDirection::E,
        CompassDirection::SE,
        CompassDirection::S,
        CompassDirection::SW,
        CompassDirection::W,
        CompassDirection::NW,
    ];

    /// Nearest direction to a bearing in degrees (any value, wrapped to [0, 360)).
    pub fn from_bearing(bearing_deg: f64) -> Self {
        let normalized = bearing_deg.rem_euclid(360.0);
        let sector = (normalized / 45.0).round() as usize % 8;
        Self::ALL[sector]
    }

    /// Central bearing of the direction
    pub fn bearing(&self) -> f64 {
        Self::ALL
            .iter()
            .position(|d| d == self)
            .map_or(0.0, |i| i as f64 * 45.0)
    }

    pub fn code(&self) -> &'static str {
        match self {
            CompassDirection::N => "N",
            CompassDirection::NE => "NE",
            CompassDirection::E => "E",
            CompassDirection::SE => "SE",
            CompassDirection::S => "S",
            CompassDirection::SW => "SW",
            CompassDirection::W => "W",
            CompassDirection::NW => "NW",
        }
    }
}

impl Display for CompassDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Cardinal facade of a building, as consumed by floor-plan generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facade {
    North,
    East,
    South,
    West,
}

impl Facade {
    /// Reduces a bearing to the nearest cardinal facade.
    /// Exact diagonals resolve clockwise (NE -> East, SE -> South, ...).
    pub fn from_bearing(bearing_deg: f64) -> Self {
        let normalized = bearing_deg.rem_euclid(360.0);
        match ((normalized + 45.0) / 90.0).floor() as usize % 4 {
            0 => Facade::North,
            1 => Facade::East,
            2 => Facade::South,
            _ => Facade::West,
        }
    }
}

impl From<CompassDirection> for Facade {
    fn from(d: CompassDirection) -> Self {
        Facade::from_bearing(d.bearing())
    }
}
