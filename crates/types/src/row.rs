//! Clustered location rows from the tabular source.

use crate::coords::LatLng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One geocoded location with its community assignment on every level.
///
/// The flat field layout is
/// `node_id, community_1 .. community_k, country_code, latitude, longitude, place_name`.
/// Every column between the id and the country code is a community column.
/// The row serializes back to that flat array of strings, which is how
/// region files record outliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct LocationRow {
    pub node_id: String,
    pub communities: Vec<i64>,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
}

/// Error returned when a row cannot be interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum RowError {
    /// Fewer than the five mandatory columns
    TooFewFields(usize),
    /// A community column is not an integer
    InvalidCommunity { column: usize, value: String },
    /// Latitude or longitude is not a finite number
    InvalidCoordinate { column: usize, value: String },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields(count) => {
                write!(f, "row has {} fields, at least 5 are required", count)
            }
            Self::InvalidCommunity { column, value } => {
                write!(f, "column {} is not a community id: {:?}", column, value)
            }
            Self::InvalidCoordinate { column, value } => {
                write!(f, "column {} is not a finite coordinate: {:?}", column, value)
            }
        }
    }
}

impl std::error::Error for RowError {}

impl LocationRow {
    /// Interpret a flat field list.
    ///
    /// ```
    /// use travel_regions_types::row::LocationRow;
    ///
    /// let row = LocationRow::from_fields(&[
    ///     "45", "1", "12", "2", "NY", "40.78", "-73.97", "Manhattan",
    /// ])
    /// .unwrap();
    /// assert_eq!(row.community(2), Some(12));
    /// assert_eq!(row.country_code, "NY");
    /// ```
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, RowError> {
        let count = fields.len();
        if count < 5 {
            return Err(RowError::TooFewFields(count));
        }
        let field = |index: usize| fields[index].as_ref().trim();

        let communities = (1..count - 4)
            .map(|column| {
                field(column)
                    .parse::<i64>()
                    .map_err(|_| RowError::InvalidCommunity {
                        column,
                        value: field(column).to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let coordinate = |column: usize| {
            field(column)
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| RowError::InvalidCoordinate {
                    column,
                    value: field(column).to_string(),
                })
        };

        Ok(Self {
            node_id: field(0).to_string(),
            communities,
            country_code: field(count - 4).to_string(),
            latitude: coordinate(count - 3)?,
            longitude: coordinate(count - 2)?,
            place_name: fields[count - 1].as_ref().to_string(),
        })
    }

    /// Flatten back into the tabular field layout.
    pub fn to_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.communities.len() + 5);
        fields.push(self.node_id.clone());
        fields.extend(self.communities.iter().map(i64::to_string));
        fields.push(self.country_code.clone());
        fields.push(self.latitude.to_string());
        fields.push(self.longitude.to_string());
        fields.push(self.place_name.clone());
        fields
    }

    /// Community id on a 1-based hierarchical level.
    pub fn community(&self, level: u8) -> Option<i64> {
        let index = usize::from(level).checked_sub(1)?;
        self.communities.get(index).copied()
    }

    #[inline]
    pub fn coordinates(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

impl From<LocationRow> for Vec<String> {
    fn from(row: LocationRow) -> Self {
        row.to_fields()
    }
}

impl TryFrom<Vec<String>> for LocationRow {
    type Error = RowError;

    fn try_from(fields: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_fields(&fields)
    }
}
