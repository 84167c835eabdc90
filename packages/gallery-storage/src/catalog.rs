//! Read-only catalog queries backing search and autocomplete.

use sqlx::{Postgres, QueryBuilder};

use gallery_domain::predicate::{Predicate, escape_like};

use crate::{
	Result,
	db::Db,
	models::{MediaFaceRow, PositionRow},
	predicate_sql,
};

/// Which matching media a row query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
	/// The first `n` distinct media by ascending id.
	First(u32),
	/// One uniformly random media.
	Random,
}

/// Single-column sources for autocomplete suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupField {
	/// Raw comma-joined keyword lists.
	Keywords,
	PersonName,
	MediaName,
	Caption,
	DirectoryName,
}
impl LookupField {
	fn source(self) -> (&'static str, &'static str) {
		match self {
			Self::Keywords => ("media", "keywords"),
			Self::PersonName => ("persons", "name"),
			Self::MediaName => ("media", "name"),
			Self::Caption => ("media", "caption"),
			Self::DirectoryName => ("directories", "name"),
		}
	}
}

/// Loads media matching `predicate` joined with faces and persons, ordered by media id then
/// face id.
pub async fn media_rows(
	db: &Db,
	predicate: &Predicate,
	selection: Selection,
) -> Result<Vec<MediaFaceRow>> {
	let mut builder = QueryBuilder::<Postgres>::new(
		"\
SELECT
	media.id AS media_id,
	media.name AS media_name,
	media.creation_date,
	media.rating,
	media.width,
	media.height,
	media.caption,
	media.keywords,
	media.persons,
	media.country,
	media.state,
	media.city,
	media.latitude,
	media.longitude,
	directory.id AS directory_id,
	directory.name AS directory_name,
	directory.path AS directory_path,
	face.id AS face_id,
	face.box_left,
	face.box_top,
	face.box_width,
	face.box_height,
	person.id AS person_id,
	person.name AS person_name
FROM (",
	);

	push_matching_ids(&mut builder, predicate, selection);
	builder.push(
		"\
) matched
JOIN media ON media.id = matched.id
JOIN directories directory ON directory.id = media.directory_id
LEFT JOIN face_regions face ON face.media_id = media.id
LEFT JOIN persons person ON person.id = face.person_id
ORDER BY media.id ASC, face.id ASC",
	);

	let rows: Vec<MediaFaceRow> = builder.build_query_as().fetch_all(&db.pool).await?;

	tracing::debug!(rows = rows.len(), ?selection, "Loaded media rows.");

	Ok(rows)
}

/// Distinct values of `field` containing `text`, case-insensitively.
pub async fn match_field(
	db: &Db,
	field: LookupField,
	text: &str,
	limit: u32,
) -> Result<Vec<String>> {
	let (table, column) = field.source();
	let order = if field == LookupField::PersonName { " ORDER BY 1" } else { "" };
	let sql = format!(
		"SELECT DISTINCT {column} FROM {table} WHERE {column} ILIKE $1 ESCAPE '\\'{order} LIMIT $2"
	);
	let values: Vec<String> = sqlx::query_scalar(sql.as_str())
		.bind(contains_pattern(text))
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(values)
}

/// Position groups where any of country, state or city contains `text`.
pub async fn match_positions(db: &Db, text: &str, limit: u32) -> Result<Vec<PositionRow>> {
	let rows: Vec<PositionRow> = sqlx::query_as(
		"\
SELECT country, state, city
FROM media
WHERE country ILIKE $1 ESCAPE '\\'
	OR state ILIKE $1 ESCAPE '\\'
	OR city ILIKE $1 ESCAPE '\\'
GROUP BY country, state, city
ORDER BY country, state, city
LIMIT $2",
	)
	.bind(contains_pattern(text))
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

fn push_matching_ids(
	builder: &mut QueryBuilder<'_, Postgres>,
	predicate: &Predicate,
	selection: Selection,
) {
	builder.push(match selection {
		Selection::First(_) => "SELECT DISTINCT media.id",
		Selection::Random => "SELECT media.id",
	});
	builder.push(
		" FROM media LEFT JOIN directories directory ON directory.id = media.directory_id WHERE ",
	);
	predicate_sql::push_predicate(builder, predicate);

	match selection {
		Selection::First(limit) => {
			builder.push(" ORDER BY media.id ASC LIMIT ");
			builder.push_bind(i64::from(limit));
		},
		Selection::Random => {
			builder.push(" ORDER BY random() LIMIT 1");
		},
	}
}

fn contains_pattern(text: &str) -> String {
	format!("%{}%", escape_like(text))
}
