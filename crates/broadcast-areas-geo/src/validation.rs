use broadcast_areas_core::error::{BroadcastAreasError, Result};
use broadcast_areas_core::models::{CoordinatePair, Ring};
use geo::{Coord, LineString, Polygon};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// Turn the first error into a geometry construction error
    pub fn into_result(self) -> Result<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(error) => Err(BroadcastAreasError::InvalidGeometry {
                location: error.location,
                reason: error.reason,
            }),
        }
    }
}

fn validate_ring(ring: &[CoordinatePair], location: String, result: &mut ValidationResult) {
    if ring.len() < 4 {
        result.add_error(location, format!("Ring must have at least 4 points, found {}", ring.len()));
        return;
    }

    for (i, pair) in ring.iter().enumerate() {
        if !pair[0].is_finite() || !pair[1].is_finite() {
            result.add_error(format!("{}[{}]", location, i), "Coordinates must be finite".to_string());
        }
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                location,
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }
}

/// Validate the rings of one polygon: the exterior first, then any holes
pub fn validate_rings(rings: &[Ring], location: &str) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let Some((exterior, interiors)) = rings.split_first() else {
        result.add_error(location.to_string(), "Polygon has no exterior ring".to_string());
        return result;
    };

    validate_ring(exterior, format!("{} exterior", location), &mut result);
    for (i, interior) in interiors.iter().enumerate() {
        validate_ring(interior, format!("{} interior[{}]", location, i), &mut result);
    }

    result
}

/// Build a polygon from closed rings, rejecting anything malformed.
///
/// `geo` closes open rings on construction, so validation has to run on the
/// raw coordinates first.
pub fn polygon_from_rings(rings: &[Ring], location: &str) -> Result<Polygon<f64>> {
    validate_rings(rings, location).into_result()?;

    let to_line_string =
        |ring: &Ring| LineString::new(ring.iter().map(|c| Coord { x: c[0], y: c[1] }).collect());

    let exterior = to_line_string(&rings[0]);
    let interiors = rings[1..].iter().map(to_line_string).collect();
    Ok(Polygon::new(exterior, interiors))
}
