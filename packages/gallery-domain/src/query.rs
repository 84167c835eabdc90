use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::geo::Coordinates;

/// A structured search request. Composite nodes nest arbitrarily; every other variant is a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchQuery {
	List(ListQuery),
	SomeOf(SomeOfQuery),
	Text(TextQuery),
	Range(RangeQuery),
	Orientation(OrientationQuery),
	Distance(DistanceQuery),
}
impl SearchQuery {
	pub fn and(children: Vec<SearchQuery>) -> Self {
		Self::List(ListQuery { kind: ListKind::And, children })
	}

	pub fn or(children: Vec<SearchQuery>) -> Self {
		Self::List(ListQuery { kind: ListKind::Or, children })
	}

	pub fn some_of(min: Option<u32>, children: Vec<SearchQuery>) -> Self {
		Self::SomeOf(SomeOfQuery { min, children })
	}

	pub fn kind(&self) -> SearchQueryKind {
		match self {
			Self::List(list) => match list.kind {
				ListKind::And => SearchQueryKind::And,
				ListKind::Or => SearchQueryKind::Or,
			},
			Self::SomeOf(_) => SearchQueryKind::SomeOf,
			Self::Text(text) => text.kind.into(),
			Self::Range(range) => range.kind.into(),
			Self::Orientation(_) => SearchQueryKind::Orientation,
			Self::Distance(_) => SearchQueryKind::Distance,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
	And,
	Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
	pub kind: ListKind,
	pub children: Vec<SearchQuery>,
}

/// Matches when at least `min` of `children` match. An absent `min` means one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SomeOfQuery {
	#[serde(default)]
	pub min: Option<u32>,
	pub children: Vec<SearchQuery>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
	AnyText,
	FileName,
	Caption,
	Keyword,
	Person,
	Directory,
	Position,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
	#[default]
	Partial,
	Exact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextQuery {
	pub kind: TextKind,
	pub text: String,
	#[serde(default)]
	pub match_mode: MatchMode,
	#[serde(default)]
	pub negate: bool,
}
impl TextQuery {
	pub fn partial(kind: TextKind, text: impl Into<String>) -> Self {
		Self { kind, text: text.into(), match_mode: MatchMode::Partial, negate: false }
	}

	pub fn exact(kind: TextKind, text: impl Into<String>) -> Self {
		Self { kind, text: text.into(), match_mode: MatchMode::Exact, negate: false }
	}

	pub fn negated(self) -> Self {
		Self { negate: true, ..self }
	}
}
impl From<TextQuery> for SearchQuery {
	fn from(query: TextQuery) -> Self {
		Self::Text(query)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
	MinRating,
	MaxRating,
	/// Megapixels.
	MinResolution,
	/// Megapixels.
	MaxResolution,
	FromDate,
	ToDate,
}

/// Range bound. Date kinds take a timestamp, rating and resolution kinds take a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeValue {
	Date(#[serde(with = "crate::rfc3339")] OffsetDateTime),
	Number(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeQuery {
	pub kind: RangeKind,
	#[serde(default)]
	pub value: Option<RangeValue>,
	#[serde(default)]
	pub negate: bool,
}
impl RangeQuery {
	pub fn number(kind: RangeKind, value: f64) -> Self {
		Self { kind, value: Some(RangeValue::Number(value)), negate: false }
	}

	pub fn date(kind: RangeKind, value: OffsetDateTime) -> Self {
		Self { kind, value: Some(RangeValue::Date(value)), negate: false }
	}

	pub fn negated(self) -> Self {
		Self { negate: true, ..self }
	}
}
impl From<RangeQuery> for SearchQuery {
	fn from(query: RangeQuery) -> Self {
		Self::Range(query)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationQuery {
	pub landscape: bool,
}
impl From<OrientationQuery> for SearchQuery {
	fn from(query: OrientationQuery) -> Self {
		Self::Orientation(query)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceQuery {
	/// Free-text place name resolved through the gazetteer.
	#[serde(default)]
	pub origin: String,
	/// Attached by geo resolution; required by the compiler.
	#[serde(default)]
	pub coordinates: Option<Coordinates>,
	pub radius_km: f64,
	#[serde(default)]
	pub negate: bool,
}
impl From<DistanceQuery> for SearchQuery {
	fn from(query: DistanceQuery) -> Self {
		Self::Distance(query)
	}
}

/// Flat discriminant over every query kind. Also the category of autocomplete suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchQueryKind {
	And,
	Or,
	SomeOf,
	AnyText,
	FileName,
	Caption,
	Keyword,
	Person,
	Directory,
	Position,
	Distance,
	FromDate,
	ToDate,
	MinRating,
	MaxRating,
	MinResolution,
	MaxResolution,
	Orientation,
}
impl SearchQueryKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::And => "and",
			Self::Or => "or",
			Self::SomeOf => "some_of",
			Self::AnyText => "any_text",
			Self::FileName => "file_name",
			Self::Caption => "caption",
			Self::Keyword => "keyword",
			Self::Person => "person",
			Self::Directory => "directory",
			Self::Position => "position",
			Self::Distance => "distance",
			Self::FromDate => "from_date",
			Self::ToDate => "to_date",
			Self::MinRating => "min_rating",
			Self::MaxRating => "max_rating",
			Self::MinResolution => "min_resolution",
			Self::MaxResolution => "max_resolution",
			Self::Orientation => "orientation",
		}
	}
}
impl From<TextKind> for SearchQueryKind {
	fn from(kind: TextKind) -> Self {
		match kind {
			TextKind::AnyText => Self::AnyText,
			TextKind::FileName => Self::FileName,
			TextKind::Caption => Self::Caption,
			TextKind::Keyword => Self::Keyword,
			TextKind::Person => Self::Person,
			TextKind::Directory => Self::Directory,
			TextKind::Position => Self::Position,
		}
	}
}
impl From<RangeKind> for SearchQueryKind {
	fn from(kind: RangeKind) -> Self {
		match kind {
			RangeKind::MinRating => Self::MinRating,
			RangeKind::MaxRating => Self::MaxRating,
			RangeKind::MinResolution => Self::MinResolution,
			RangeKind::MaxResolution => Self::MaxResolution,
			RangeKind::FromDate => Self::FromDate,
			RangeKind::ToDate => Self::ToDate,
		}
	}
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use crate::query::{
		ListKind, MatchMode, RangeKind, RangeValue, SearchQuery, SearchQueryKind, TextKind,
	};

	#[test]
	fn parses_nested_query_json() {
		let raw = serde_json::json!({
			"type": "list",
			"kind": "and",
			"children": [
				{ "type": "text", "kind": "caption", "text": "sunset" },
				{ "type": "range", "kind": "from_date", "value": "2020-01-01T00:00:00Z" },
				{ "type": "range", "kind": "min_rating", "value": 3 },
				{ "type": "some_of", "min": 2, "children": [] },
				{ "type": "orientation", "landscape": true },
				{ "type": "distance", "origin": "Budapest", "radius_km": 5.0 },
			],
		});
		let query: SearchQuery = serde_json::from_value(raw).expect("valid query");
		let SearchQuery::List(list) = query else {
			panic!("expected a list query");
		};

		assert_eq!(list.kind, ListKind::And);
		assert_eq!(list.children.len(), 6);

		let SearchQuery::Text(text) = &list.children[0] else {
			panic!("expected a text query");
		};

		assert_eq!(text.match_mode, MatchMode::Partial);
		assert!(!text.negate);

		let SearchQuery::Range(date) = &list.children[1] else {
			panic!("expected a range query");
		};

		assert_eq!(date.value, Some(RangeValue::Date(datetime!(2020-01-01 00:00:00 UTC))));

		let SearchQuery::Range(rating) = &list.children[2] else {
			panic!("expected a range query");
		};

		assert_eq!(rating.kind, RangeKind::MinRating);
		assert_eq!(rating.value, Some(RangeValue::Number(3.0)));
		assert_eq!(list.children[5].kind(), SearchQueryKind::Distance);
	}

	#[test]
	fn rejects_unknown_query_type() {
		let raw = serde_json::json!({ "type": "regex", "pattern": ".*" });

		assert!(serde_json::from_value::<SearchQuery>(raw).is_err());
	}

	#[test]
	fn kind_follows_leaf_discriminant() {
		let query: SearchQuery =
			crate::query::TextQuery::exact(TextKind::Keyword, "red").negated().into();

		assert_eq!(query.kind(), SearchQueryKind::Keyword);
		assert_eq!(SearchQuery::or(Vec::new()).kind(), SearchQueryKind::Or);
		assert_eq!(SearchQueryKind::MinResolution.as_str(), "min_resolution");
	}
}
