//! Directory data models
//!
//! Raw Firestore REST documents and the flattened [`DirectoryDocument`]
//! handed to callers. Firestore wraps every field in a typed value object
//! (`{"stringValue": "..."}`, `{"geoPointValue": {...}}`); the conversion
//! here tolerates missing or oddly typed optional fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair as stored in the directory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    #[serde(default)]
    pub latitude: f64,
    /// Longitude in degrees
    #[serde(default)]
    pub longitude: f64,
}

/// One bus or stop document, flattened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryDocument {
    /// Document id (last path segment)
    pub id: String,
    /// Display name
    pub name: Option<String>,
    /// Served city names as written in the directory
    pub cities: Vec<String>,
    /// Current (bus) or fixed (stop) position
    pub location: Option<GeoPoint>,
    /// Free-form occupancy label
    pub occupancy: Option<String>,
    /// Free-form operational status label
    pub status: Option<String>,
}

/// Response of the list-documents endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<FirestoreDocument>,
    pub next_page_token: Option<String>,
}

/// A raw Firestore document
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FirestoreDocument {
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
}

/// A Firestore typed value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum FirestoreValue {
    NullValue(serde_json::Value),
    BooleanValue(bool),
    /// Int64 values are transported as strings
    IntegerValue(String),
    DoubleValue(FirestoreDouble),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

/// Non-finite doubles arrive as the strings `"NaN"`, `"Infinity"`, `"-Infinity"`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum FirestoreDouble {
    Number(f64),
    Text(String),
}

impl FirestoreDouble {
    fn finite(&self) -> Option<f64> {
        let value = match self {
            Self::Number(v) => *v,
            Self::Text(v) => v.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub(crate) struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub(crate) struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
}

const LOCATION_FIELDS: [&str; 3] = ["current_location", "location", "currentLocation"];
const OCCUPANCY_FIELDS: [&str; 3] = ["occupancy", "seat_status", "seatStatus"];

impl FirestoreValue {
    fn as_str(&self) -> Option<&str> {
        match self {
            Self::StringValue(s) => Some(s),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::DoubleValue(v) => v.finite(),
            Self::IntegerValue(v) => v.parse::<i64>().ok().map(|v| v as f64),
            Self::StringValue(v) => v.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_geo_point(&self) -> Option<GeoPoint> {
        match self {
            Self::GeoPointValue(point) => Some(*point),
            Self::MapValue(map) => {
                let latitude = map
                    .fields
                    .get("latitude")
                    .or_else(|| map.fields.get("lat"))?
                    .as_f64()?;
                let longitude = map
                    .fields
                    .get("longitude")
                    .or_else(|| map.fields.get("lng"))
                    .or_else(|| map.fields.get("lon"))?
                    .as_f64()?;
                Some(GeoPoint {
                    latitude,
                    longitude,
                })
            },
            _ => None,
        }
    }

    /// Strings from an array, or the comma-separated parts of a single string
    fn as_string_list(&self) -> Vec<String> {
        match self {
            Self::ArrayValue(array) => array
                .values
                .iter()
                .filter_map(Self::as_str)
                .map(str::to_string)
                .collect(),
            Self::StringValue(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl FirestoreDocument {
    /// Document id: the last segment of the resource name
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    fn string_field(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .find_map(|name| self.fields.get(*name).and_then(FirestoreValue::as_str))
            .map(str::to_string)
    }

    pub fn into_directory_document(self) -> DirectoryDocument {
        let location = LOCATION_FIELDS
            .iter()
            .find_map(|name| self.fields.get(*name).and_then(FirestoreValue::as_geo_point));
        let cities = self
            .fields
            .get("cities")
            .map(FirestoreValue::as_string_list)
            .unwrap_or_default();

        DirectoryDocument {
            id: self.id().to_string(),
            name: self.string_field(&["name"]),
            cities,
            location,
            occupancy: self.string_field(&OCCUPANCY_FIELDS),
            status: self.string_field(&["status"]),
        }
    }
}
