//! Record normalizer
//!
//! Converts one raw field mapping into a typed candidate entity, or signals
//! a row-level skip. Skips are a data-quality filter, not a fault: they are
//! counted by the orchestrator but never abort the file. Coordinate *range*
//! checking is deliberately not done here; that is the store's entity-level
//! concern and stays a distinct failure class.

use crate::decoders::RawRecord;
use crate::rating;
use thiserror::Error;
use waypost_common::db::NewPointOfInterest;

/// Why a single input row was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("empty external id after trim")]
    EmptyExternalId,

    #[error("empty name after trim")]
    EmptyName,

    #[error("latitude is not a number")]
    InvalidLatitude,

    #[error("longitude is not a number")]
    InvalidLongitude,

    /// A required value was structurally absent from the row
    #[error("missing required field")]
    MissingField,

    /// The row could not be read at all (decoder-level)
    #[error("unreadable row")]
    UnreadableRow,

    /// JSON array element that is not an object
    #[error("record is not an object")]
    NotAnObject,
}

/// Outcome of normalizing one raw row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Valid candidate, ready for the upsert store
    Record(NewPointOfInterest),
    /// Row discarded; the reason is inspectable but silent to the batch
    Skip(SkipReason),
}

/// Validate and type one raw record.
///
/// Trims identifiers, parses coordinates, derives the average rating from
/// the raw ratings payload and stamps the provenance filename.
pub fn normalize(raw: &RawRecord) -> RowOutcome {
    let external_id = raw.external_id.trim();
    if external_id.is_empty() {
        return RowOutcome::Skip(SkipReason::EmptyExternalId);
    }

    let name = raw.name.trim();
    if name.is_empty() {
        return RowOutcome::Skip(SkipReason::EmptyName);
    }

    let Ok(latitude) = raw.latitude.trim().parse::<f64>() else {
        return RowOutcome::Skip(SkipReason::InvalidLatitude);
    };
    let Ok(longitude) = raw.longitude.trim().parse::<f64>() else {
        return RowOutcome::Skip(SkipReason::InvalidLongitude);
    };

    let ratings_raw = raw.ratings.trim().to_string();
    let average_rating = rating::average_rating(&ratings_raw);

    RowOutcome::Record(NewPointOfInterest {
        external_id: external_id.to_string(),
        name: name.to_string(),
        latitude,
        longitude,
        category: raw.category.trim().to_string(),
        ratings_raw,
        average_rating,
        description: raw.description.as_deref().map(|d| d.trim().to_string()),
        source_file: raw.source_file.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawRecord {
        RawRecord {
            external_id: " 101 ".to_string(),
            name: " Cafe ".to_string(),
            latitude: "10.5".to_string(),
            longitude: "20.5".to_string(),
            category: "restaurant".to_string(),
            ratings: " [3,4,5] ".to_string(),
            description: None,
            source_file: "pois.csv".to_string(),
        }
    }

    #[test]
    fn valid_row_is_normalized_and_typed() {
        let RowOutcome::Record(record) = normalize(&raw()) else {
            panic!("expected a record");
        };
        assert_eq!(record.external_id, "101");
        assert_eq!(record.name, "Cafe");
        assert_eq!(record.latitude, 10.5);
        assert_eq!(record.longitude, 20.5);
        assert_eq!(record.ratings_raw, "[3,4,5]");
        assert_eq!(record.average_rating, Some(4.0));
        assert_eq!(record.source_file, "pois.csv");
    }

    #[test]
    fn blank_identifier_or_name_skips_the_row() {
        let mut record = raw();
        record.external_id = "   ".to_string();
        assert_eq!(
            normalize(&record),
            RowOutcome::Skip(SkipReason::EmptyExternalId)
        );

        let mut record = raw();
        record.name = String::new();
        assert_eq!(normalize(&record), RowOutcome::Skip(SkipReason::EmptyName));
    }

    #[test]
    fn unparsable_coordinates_skip_the_row() {
        let mut record = raw();
        record.latitude = "north".to_string();
        assert_eq!(
            normalize(&record),
            RowOutcome::Skip(SkipReason::InvalidLatitude)
        );

        let mut record = raw();
        record.longitude = String::new();
        assert_eq!(
            normalize(&record),
            RowOutcome::Skip(SkipReason::InvalidLongitude)
        );
    }

    #[test]
    fn out_of_range_coordinates_still_normalize() {
        // Range enforcement belongs to the store, not the normalizer
        let mut record = raw();
        record.latitude = "95.0".to_string();
        assert!(matches!(normalize(&record), RowOutcome::Record(_)));
    }

    #[test]
    fn unparsable_ratings_become_no_rating() {
        let mut record = raw();
        record.ratings = "4, bad, 2".to_string();
        let RowOutcome::Record(record) = normalize(&record) else {
            panic!("expected a record");
        };
        assert_eq!(record.average_rating, None);
        // Raw payload is retained even when unparsable
        assert_eq!(record.ratings_raw, "4, bad, 2");
    }

    #[test]
    fn description_is_trimmed_when_present() {
        let mut record = raw();
        record.description = Some("  a quiet corner  ".to_string());
        let RowOutcome::Record(record) = normalize(&record) else {
            panic!("expected a record");
        };
        assert_eq!(record.description.as_deref(), Some("a quiet corner"));
    }
}
