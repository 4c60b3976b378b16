//! Canonical entity model for the catalogue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inclusive latitude range accepted by the store (decimal degrees)
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Inclusive longitude range accepted by the store (decimal degrees)
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A stored point of interest.
///
/// `external_id` is the natural key from the source file: later imports of
/// the same id fully replace every mutable field. `average_rating` is always
/// derived from `ratings_raw` before the write, never supplied by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub guid: Uuid,
    pub external_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    /// Original unparsed ratings payload, retained verbatim
    pub ratings_raw: String,
    /// Derived mean of `ratings_raw`, rounded to 2 decimal places
    pub average_rating: Option<f64>,
    pub description: Option<String>,
    /// Base filename of the origin import, for provenance
    pub source_file: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A normalized candidate record, ready for upsert.
///
/// Carries everything the pipeline computes; `guid` and the timestamps are
/// assigned by the store at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPointOfInterest {
    pub external_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub ratings_raw: String,
    pub average_rating: Option<f64>,
    pub description: Option<String>,
    pub source_file: String,
}

impl NewPointOfInterest {
    /// True when both coordinates fall inside the declared ranges.
    ///
    /// Out-of-range values make the entity invalid at the store boundary;
    /// they are never clamped.
    pub fn coordinates_in_range(&self) -> bool {
        let (lat_min, lat_max) = LATITUDE_RANGE;
        let (lon_min, lon_max) = LONGITUDE_RANGE;
        self.latitude >= lat_min
            && self.latitude <= lat_max
            && self.longitude >= lon_min
            && self.longitude <= lon_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(latitude: f64, longitude: f64) -> NewPointOfInterest {
        NewPointOfInterest {
            external_id: "ext-1".to_string(),
            name: "Somewhere".to_string(),
            latitude,
            longitude,
            category: String::new(),
            ratings_raw: String::new(),
            average_rating: None,
            description: None,
            source_file: "somewhere.csv".to_string(),
        }
    }

    #[test]
    fn boundary_coordinates_are_in_range() {
        assert!(candidate(90.0, 180.0).coordinates_in_range());
        assert!(candidate(-90.0, -180.0).coordinates_in_range());
        assert!(candidate(0.0, 0.0).coordinates_in_range());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert!(!candidate(95.0, 0.0).coordinates_in_range());
        assert!(!candidate(-90.5, 0.0).coordinates_in_range());
        assert!(!candidate(0.0, 180.1).coordinates_in_range());
        assert!(!candidate(0.0, -181.0).coordinates_in_range());
    }
}
