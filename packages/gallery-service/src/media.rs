//! Read-only media projections returned to callers.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use gallery_domain::geo::Coordinates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
	pub id: i64,
	pub name: String,
	pub directory: DirectoryRef,
	pub metadata: MediaMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRef {
	pub id: i64,
	pub name: String,
	/// Parent prefix, including its trailing separator.
	pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
	#[serde(with = "gallery_domain::rfc3339")]
	pub creation_date: OffsetDateTime,
	pub rating: Option<i32>,
	pub width: i32,
	pub height: i32,
	pub caption: Option<String>,
	pub keywords: Vec<String>,
	pub persons: Vec<String>,
	pub position: Option<PositionData>,
	pub faces: Vec<FaceRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
	pub country: Option<String>,
	pub state: Option<String>,
	pub city: Option<String>,
	pub gps: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRegion {
	pub id: i64,
	#[serde(rename = "box")]
	pub bounds: FaceBox,
	/// Absent when the referenced person no longer resolves.
	pub person: Option<PersonRef>,
}

/// Face rectangle relative to the image, all values in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRef {
	pub id: i64,
	pub name: String,
}
