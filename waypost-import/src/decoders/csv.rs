//! CSV decoder
//!
//! Header-driven: one row is one candidate record. Input columns are
//! matched by name; a column missing from the header defaults to empty
//! (zero for coordinates), while a value structurally absent from a single
//! row skips just that row.

use super::{DecodeError, RawRecord, RawRow};
use crate::normalize::SkipReason;
use ::csv::{ReaderBuilder, StringRecord};
use std::path::Path;

const COL_ID: &str = "poi_id";
const COL_NAME: &str = "poi_name";
const COL_LATITUDE: &str = "poi_latitude";
const COL_LONGITUDE: &str = "poi_longitude";
const COL_CATEGORY: &str = "poi_category";
const COL_RATINGS: &str = "poi_ratings";

pub fn decode(path: &Path, source_file: &str) -> Result<Vec<RawRow>, DecodeError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| DecodeError::FileAccess(path.to_path_buf(), e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| DecodeError::InvalidCsv(e.to_string()))?
        .clone();

    let columns = Columns::locate(&headers);

    let mut rows = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => rows.push(columns.extract(&record, source_file)),
            // A single unreadable row does not abort the file
            Err(e) => {
                tracing::debug!("skipping unreadable CSV row: {}", e);
                rows.push(Err(SkipReason::UnreadableRow));
            }
        }
    }

    Ok(rows)
}

/// Header positions for the expected input columns; `None` when the column
/// is absent from the file entirely.
struct Columns {
    id: Option<usize>,
    name: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    category: Option<usize>,
    ratings: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Self {
        let position = |wanted: &str| headers.iter().position(|h| h.trim() == wanted);
        Self {
            id: position(COL_ID),
            name: position(COL_NAME),
            latitude: position(COL_LATITUDE),
            longitude: position(COL_LONGITUDE),
            category: position(COL_CATEGORY),
            ratings: position(COL_RATINGS),
        }
    }

    fn extract(&self, record: &StringRecord, source_file: &str) -> RawRow {
        // A column named in the header must yield a value for this row;
        // a column absent from the header falls back to its default.
        let field = |column: Option<usize>, default: &str| -> Result<String, SkipReason> {
            match column {
                Some(index) => record
                    .get(index)
                    .map(str::to_string)
                    .ok_or(SkipReason::MissingField),
                None => Ok(default.to_string()),
            }
        };

        Ok(RawRecord {
            external_id: field(self.id, "")?,
            name: field(self.name, "")?,
            latitude: field(self.latitude, "0")?,
            longitude: field(self.longitude, "0")?,
            category: field(self.category, "")?,
            ratings: field(self.ratings, "")?,
            description: None,
            source_file: source_file.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn rows_are_extracted_by_header_name() {
        let file = write_csv(
            "poi_id,poi_name,poi_latitude,poi_longitude,poi_category,poi_ratings\n\
             1,Cafe,10.5,20.5,restaurant,\"[3,4,5]\"\n",
        );
        let rows = decode(file.path(), "pois.csv").unwrap();
        assert_eq!(rows.len(), 1);
        let record = rows[0].as_ref().unwrap();
        assert_eq!(record.external_id, "1");
        assert_eq!(record.name, "Cafe");
        assert_eq!(record.latitude, "10.5");
        assert_eq!(record.longitude, "20.5");
        assert_eq!(record.category, "restaurant");
        assert_eq!(record.ratings, "[3,4,5]");
        assert_eq!(record.description, None);
        assert_eq!(record.source_file, "pois.csv");
    }

    #[test]
    fn shuffled_columns_still_map_correctly() {
        let file = write_csv(
            "poi_ratings,poi_name,poi_id\n\
             \"4,5\",Park,22\n",
        );
        let rows = decode(file.path(), "pois.csv").unwrap();
        let record = rows[0].as_ref().unwrap();
        assert_eq!(record.external_id, "22");
        assert_eq!(record.name, "Park");
        assert_eq!(record.ratings, "4,5");
    }

    #[test]
    fn missing_columns_default_to_empty_or_zero() {
        let file = write_csv("poi_id,poi_name\n7,Museum\n");
        let rows = decode(file.path(), "pois.csv").unwrap();
        let record = rows[0].as_ref().unwrap();
        assert_eq!(record.latitude, "0");
        assert_eq!(record.longitude, "0");
        assert_eq!(record.category, "");
        assert_eq!(record.ratings, "");
    }

    #[test]
    fn short_row_is_skipped_not_fatal() {
        let file = write_csv(
            "poi_id,poi_name,poi_latitude,poi_longitude,poi_category,poi_ratings\n\
             1,OnlyTwoValues\n\
             2,Complete,1.0,2.0,park,\n",
        );
        let rows = decode(file.path(), "pois.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_err());
        assert!(rows[1].is_ok());
    }

    #[test]
    fn empty_body_yields_no_rows() {
        let file = write_csv("poi_id,poi_name,poi_latitude\n");
        let rows = decode(file.path(), "pois.csv").unwrap();
        assert!(rows.is_empty());
    }
}
