use time::OffsetDateTime;

/// One row of media left-joined with its face regions and their persons.
///
/// Face and person columns are all `NULL` for media without faces.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MediaFaceRow {
	pub media_id: i64,
	pub media_name: String,
	pub creation_date: OffsetDateTime,
	pub rating: Option<i32>,
	pub width: i32,
	pub height: i32,
	pub caption: Option<String>,
	pub keywords: Option<String>,
	pub persons: Option<String>,
	pub country: Option<String>,
	pub state: Option<String>,
	pub city: Option<String>,
	pub latitude: Option<f64>,
	pub longitude: Option<f64>,
	pub directory_id: i64,
	pub directory_name: String,
	pub directory_path: String,
	pub face_id: Option<i64>,
	pub box_left: Option<f64>,
	pub box_top: Option<f64>,
	pub box_width: Option<f64>,
	pub box_height: Option<f64>,
	pub person_id: Option<i64>,
	pub person_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PositionRow {
	pub country: Option<String>,
	pub state: Option<String>,
	pub city: Option<String>,
}
