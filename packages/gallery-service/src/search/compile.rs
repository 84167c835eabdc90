//! Lowers a normalized query tree into a [`Predicate`].

use gallery_domain::{
	geo::BoundingBox,
	path,
	predicate::{CompareOp, Field, Operand, Param, Predicate, escape_like},
	query::{
		DistanceQuery, ListKind, MatchMode, RangeKind, RangeQuery, RangeValue, SearchQuery,
		SearchQueryKind, TextKind, TextQuery,
	},
};

use crate::{Error, Result};

const PIXELS_PER_MEGAPIXEL: f64 = 1_000_000.0;

/// Source of parameter name suffixes. One compile call owns one counter.
#[derive(Debug, Default)]
pub struct ParamCounter {
	value: u32,
}
impl ParamCounter {
	fn next(&mut self) -> u32 {
		self.value += 1;

		self.value
	}
}

/// Compiles `query` with a fresh counter.
pub fn compile(query: &SearchQuery) -> Result<Predicate> {
	compile_with(query, &mut ParamCounter::default())
}

/// Compiles `query`, drawing parameter suffixes from `counter`.
///
/// Distance nodes must already carry coordinates and SOME_OF nodes must already be expanded.
pub fn compile_with(query: &SearchQuery, counter: &mut ParamCounter) -> Result<Predicate> {
	match query {
		SearchQuery::List(list) => {
			let children = list
				.children
				.iter()
				.map(|child| compile_with(child, counter))
				.collect::<Result<Vec<_>>>()?;

			Ok(match list.kind {
				ListKind::And => Predicate::And(children),
				ListKind::Or => Predicate::Or(children),
			})
		},
		SearchQuery::SomeOf(_) =>
			Err(Error::UnsupportedNode { kind: SearchQueryKind::SomeOf.as_str().to_string() }),
		SearchQuery::Distance(distance) => compile_distance(distance, counter),
		SearchQuery::Range(range) => compile_range(range, counter),
		SearchQuery::Orientation(orientation) => {
			counter.next();

			let op = if orientation.landscape { CompareOp::Ge } else { CompareOp::Le };

			Ok(Predicate::ColumnCompare { lhs: Field::Width, op, rhs: Field::Height })
		},
		SearchQuery::Text(text) => Ok(compile_text(text, counter)),
	}
}

fn compile_distance(query: &DistanceQuery, counter: &mut ParamCounter) -> Result<Predicate> {
	let Some(origin) = query.coordinates else {
		return Err(Error::MissingGeoData { origin: query.origin.clone() });
	};

	if !query.radius_km.is_finite() || query.radius_km < 0.0 {
		return Err(Error::InvalidQueryShape {
			message: format!(
				"distance.radius_km must be a non-negative number, got {}.",
				query.radius_km
			),
		});
	}

	let n = counter.next();
	let bbox = BoundingBox::around(origin, query.radius_km);
	let bound = |lhs: Field, op: CompareOp, name: &str, value: f64| Predicate::Compare {
		lhs: Operand::Field(lhs),
		op,
		param: Param::number(format!("{name}{n}"), value),
	};

	// Negation is the complement of the box, not of the circle it approximates.
	Ok(if query.negate {
		Predicate::Or(vec![
			bound(Field::Latitude, CompareOp::Gt, "maxLat", bbox.max_latitude),
			bound(Field::Latitude, CompareOp::Lt, "minLat", bbox.min_latitude),
			bound(Field::Longitude, CompareOp::Gt, "maxLon", bbox.max_longitude),
			bound(Field::Longitude, CompareOp::Lt, "minLon", bbox.min_longitude),
		])
	} else {
		Predicate::And(vec![
			bound(Field::Latitude, CompareOp::Lt, "maxLat", bbox.max_latitude),
			bound(Field::Latitude, CompareOp::Gt, "minLat", bbox.min_latitude),
			bound(Field::Longitude, CompareOp::Lt, "maxLon", bbox.max_longitude),
			bound(Field::Longitude, CompareOp::Gt, "minLon", bbox.min_longitude),
		])
	})
}

fn compile_range(query: &RangeQuery, counter: &mut ParamCounter) -> Result<Predicate> {
	let kind = SearchQueryKind::from(query.kind).as_str();
	let Some(value) = query.value else {
		return Err(Error::InvalidQueryShape { message: format!("{kind} requires a value.") });
	};
	let n = counter.next();
	let lower_bound = matches!(
		query.kind,
		RangeKind::FromDate | RangeKind::MinRating | RangeKind::MinResolution
	);
	let op = match (lower_bound, query.negate) {
		(true, false) => CompareOp::Ge,
		(true, true) => CompareOp::Lt,
		(false, false) => CompareOp::Le,
		(false, true) => CompareOp::Gt,
	};
	let (lhs, param) = match (query.kind, value) {
		(RangeKind::FromDate, RangeValue::Date(date)) =>
			(Operand::Field(Field::CreationDate), Param::timestamp(format!("from{n}"), date)),
		(RangeKind::ToDate, RangeValue::Date(date)) =>
			(Operand::Field(Field::CreationDate), Param::timestamp(format!("to{n}"), date)),
		(RangeKind::FromDate | RangeKind::ToDate, RangeValue::Number(_)) =>
			return Err(Error::InvalidQueryShape {
				message: format!("{kind} requires an RFC 3339 timestamp."),
			}),
		(_, RangeValue::Date(_)) =>
			return Err(Error::InvalidQueryShape { message: format!("{kind} requires a number.") }),
		(_, RangeValue::Number(number)) if !number.is_finite() =>
			return Err(Error::InvalidQueryShape {
				message: format!("{kind} requires a finite number."),
			}),
		(range_kind, RangeValue::Number(number)) => {
			let name = if lower_bound { format!("min{n}") } else { format!("max{n}") };

			match range_kind {
				RangeKind::MinResolution | RangeKind::MaxResolution =>
					(Operand::PixelArea, Param::number(name, number * PIXELS_PER_MEGAPIXEL)),
				_ => (Operand::Field(Field::Rating), Param::number(name, number)),
			}
		},
	};

	Ok(Predicate::Compare { lhs, op, param })
}

fn compile_text(query: &TextQuery, counter: &mut ParamCounter) -> Predicate {
	let n = counter.next();
	let matcher = TextMatcher { negated: query.negate, mode: query.match_mode };
	let text = matcher.param(format!("text{n}"), &query.text);
	let covers_field = |kind: TextKind| query.kind == TextKind::AnyText || query.kind == kind;
	let mut alternatives = Vec::new();

	if covers_field(TextKind::Directory) {
		let path = path::decompose(&query.text);
		let mut directory = vec![matcher.like(
			Field::DirectoryName,
			matcher.param(format!("dirName{n}"), &path.name),
		)];

		if let Some(parent) = &path.parent {
			directory.push(
				matcher.like(Field::DirectoryPath, matcher.param(format!("parentName{n}"), parent)),
			);
		}

		alternatives.push(
			matcher.like(Field::DirectoryPath, matcher.param(format!("fullPath{n}"), &path.full)),
		);
		alternatives.push(matcher.flipped(directory));
	}
	if covers_field(TextKind::FileName) {
		alternatives.push(matcher.like(Field::MediaName, text.clone()));
	}
	if covers_field(TextKind::Caption) {
		alternatives.push(matcher.like(Field::Caption, text.clone()));
	}
	if covers_field(TextKind::Position) {
		for field in [Field::Country, Field::State, Field::City] {
			alternatives.push(matcher.like(field, text.clone()));
		}
	}
	if covers_field(TextKind::Person) {
		alternatives.push(matcher.list_field(Field::Persons, &query.text, &text, n));
	}
	if covers_field(TextKind::Keyword) {
		alternatives.push(matcher.list_field(Field::Keywords, &query.text, &text, n));
	}

	matcher.connective(alternatives)
}

struct TextMatcher {
	negated: bool,
	mode: MatchMode,
}
impl TextMatcher {
	fn param(&self, name: String, text: &str) -> Param {
		let escaped = escape_like(text);

		match self.mode {
			MatchMode::Exact => Param::text(name, escaped),
			MatchMode::Partial => Param::text(name, format!("%{escaped}%")),
		}
	}

	fn like(&self, field: Field, param: Param) -> Predicate {
		Predicate::Like { field, negated: self.negated, param }
	}

	/// OR across searched fields; AND when negated, so no searched field may match.
	fn connective(&self, children: Vec<Predicate>) -> Predicate {
		if self.negated { Predicate::And(children) } else { Predicate::Or(children) }
	}

	fn flipped(&self, children: Vec<Predicate>) -> Predicate {
		if self.negated { Predicate::Or(children) } else { Predicate::And(children) }
	}

	/// Matches one element of a comma-joined list field.
	fn list_field(&self, field: Field, raw: &str, text: &Param, n: u32) -> Predicate {
		let matched = match self.mode {
			MatchMode::Partial => self.like(field, text.clone()),
			MatchMode::Exact => {
				let escaped = escape_like(raw);

				self.connective(vec![
					self.like(field, Param::text(format!("CtextC{n}"), format!("%,{escaped},%"))),
					self.like(field, Param::text(format!("Ctext{n}"), format!("%,{escaped}"))),
					self.like(field, Param::text(format!("textC{n}"), format!("{escaped},%"))),
					self.like(field, Param::text(format!("text_exact{n}"), escaped)),
				])
			},
		};

		// A missing list holds no element, so it satisfies every negated match.
		if self.negated { Predicate::Or(vec![matched, Predicate::IsNull(field)]) } else { matched }
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use time::macros::datetime;

	use gallery_domain::{
		geo::Coordinates,
		predicate::{CompareOp, Field, Operand, ParamValue, Predicate, Record, Value},
		query::{
			DistanceQuery, OrientationQuery, RangeKind, RangeQuery, SearchQuery, TextKind,
			TextQuery,
		},
	};

	use crate::{
		Error,
		search::compile::{ParamCounter, compile, compile_with},
	};

	#[derive(Default)]
	struct Row(HashMap<Field, Value<'static>>);
	impl Record for Row {
		fn value(&self, field: Field) -> Value<'_> {
			self.0.get(&field).copied().unwrap_or(Value::Null)
		}
	}

	fn full_row() -> Row {
		Row(HashMap::from([
			(Field::MediaName, Value::Text("IMG_0042.jpg")),
			(Field::Caption, Value::Text("Sunset over the lake")),
			(Field::Keywords, Value::Text("red,blue,green")),
			(Field::Persons, Value::Text("Alice,Bob")),
			(Field::Country, Value::Text("Hungary")),
			(Field::State, Value::Text("Pest")),
			(Field::City, Value::Text("Budapest")),
			(Field::DirectoryName, Value::Text("beach")),
			(Field::DirectoryPath, Value::Text("2019/summer/")),
		]))
	}

	fn text(kind: TextKind, value: &str, exact: bool) -> SearchQuery {
		let query = if exact { TextQuery::exact(kind, value) } else { TextQuery::partial(kind, value) };

		query.into()
	}

	fn negate(query: SearchQuery) -> SearchQuery {
		match query {
			SearchQuery::Text(text) => text.negated().into(),
			other => other,
		}
	}

	#[test]
	fn exact_and_partial_keyword_matching() {
		let row = Row(HashMap::from([(Field::Keywords, Value::Text("red,blue,green"))]));
		let matches = |value: &str, exact: bool| {
			compile(&text(TextKind::Keyword, value, exact)).expect("compile").matches(&row)
		};

		assert!(matches("red", true));
		assert!(matches("blue", true));
		assert!(matches("green", true));
		assert!(matches("ed", false));
		assert!(!matches("ed", true));
		assert!(!matches("purple", false));
	}

	#[test]
	fn negated_text_is_complement_for_non_null_fields() {
		let row = full_row();
		let kinds = [
			TextKind::AnyText,
			TextKind::FileName,
			TextKind::Caption,
			TextKind::Keyword,
			TextKind::Person,
			TextKind::Directory,
			TextKind::Position,
		];
		let samples = [
			"sun",
			"red",
			"ed",
			"Alice",
			"bob",
			"beach",
			"2019/summer/beach",
			"summer\\beach",
			"pest",
			"zzz",
			"img_",
		];

		for kind in kinds {
			for sample in samples {
				for exact in [false, true] {
					let positive = compile(&text(kind, sample, exact)).expect("compile");
					let negative = compile(&negate(text(kind, sample, exact))).expect("compile");

					assert_ne!(
						positive.matches(&row),
						negative.matches(&row),
						"kind={kind:?} text={sample:?} exact={exact}"
					);
				}
			}
		}
	}

	#[test]
	fn negated_list_match_accepts_missing_list() {
		let row = Row(HashMap::from([(Field::Caption, Value::Text("anything"))]));
		let negated = compile(&TextQuery::exact(TextKind::Person, "Alice").negated().into())
			.expect("compile");
		let positive =
			compile(&TextQuery::exact(TextKind::Person, "Alice").into()).expect("compile");

		assert!(negated.matches(&row));
		assert!(!positive.matches(&row));
	}

	#[test]
	fn directory_text_uses_decomposed_path() {
		let row = full_row();
		let matches = |value: &str| {
			compile(&text(TextKind::Directory, value, false)).expect("compile").matches(&row)
		};

		assert!(matches("summer/beach"));
		assert!(matches("summer\\beach"));
		assert!(matches("beach"));
		assert!(!matches("winter/beach"));
	}

	#[test]
	fn user_wildcards_are_literal() {
		let row = full_row();

		assert!(!compile(&text(TextKind::Caption, "%", false)).expect("compile").matches(&row));
		assert!(compile(&text(TextKind::FileName, "img_", false)).expect("compile").matches(&row));

		let literal = compile(&text(TextKind::FileName, "IMG_00_2", false)).expect("compile");

		assert!(!literal.matches(&row));
	}

	#[test]
	fn range_operators_flip_under_negation() {
		let cases = [
			(RangeKind::FromDate, false, CompareOp::Ge),
			(RangeKind::FromDate, true, CompareOp::Lt),
			(RangeKind::ToDate, false, CompareOp::Le),
			(RangeKind::ToDate, true, CompareOp::Gt),
			(RangeKind::MinRating, false, CompareOp::Ge),
			(RangeKind::MaxRating, true, CompareOp::Gt),
			(RangeKind::MinResolution, true, CompareOp::Lt),
			(RangeKind::MaxResolution, false, CompareOp::Le),
		];

		for (kind, negated, expected) in cases {
			let query = match kind {
				RangeKind::FromDate | RangeKind::ToDate =>
					RangeQuery::date(kind, datetime!(2020-01-01 00:00:00 UTC)),
				_ => RangeQuery::number(kind, 2.0),
			};
			let query = if negated { query.negated() } else { query };
			let Predicate::Compare { op, .. } = compile(&query.into()).expect("compile") else {
				panic!("expected a comparison");
			};

			assert_eq!(op, expected, "kind={kind:?} negated={negated}");
		}
	}

	#[test]
	fn resolution_compares_pixel_area_in_megapixels() {
		let Predicate::Compare { lhs, param, .. } =
			compile(&RangeQuery::number(RangeKind::MinResolution, 12.0).into()).expect("compile")
		else {
			panic!("expected a comparison");
		};

		assert_eq!(lhs, Operand::PixelArea);
		assert_eq!(param.name, "min1");
		assert_eq!(param.value, ParamValue::Number(12_000_000.0));
	}

	#[test]
	fn range_value_shape_is_checked() {
		let missing = RangeQuery { kind: RangeKind::MinRating, value: None, negate: false };
		let wrong = RangeQuery::number(RangeKind::FromDate, 3.0);
		let wrong_number =
			RangeQuery::date(RangeKind::MaxRating, datetime!(2020-01-01 00:00:00 UTC));

		for query in [missing, wrong, wrong_number] {
			assert!(matches!(compile(&query.into()), Err(Error::InvalidQueryShape { .. })));
		}
	}

	#[test]
	fn distance_requires_coordinates() {
		let query = DistanceQuery {
			origin: "Budapest".to_string(),
			coordinates: None,
			radius_km: 5.0,
			negate: false,
		};

		assert!(matches!(compile(&query.into()), Err(Error::MissingGeoData { .. })));
	}

	#[test]
	fn distance_box_and_its_complement() {
		let origin = Coordinates { latitude: 47.4979, longitude: 19.0402 };
		let query = DistanceQuery {
			origin: String::new(),
			coordinates: Some(origin),
			radius_km: 10.0,
			negate: false,
		};
		let inside = compile(&query.clone().into()).expect("compile");
		let outside =
			compile(&DistanceQuery { negate: true, ..query }.into()).expect("compile");
		let near = Row(HashMap::from([
			(Field::Latitude, Value::Number(47.50)),
			(Field::Longitude, Value::Number(19.05)),
		]));
		let far = Row(HashMap::from([
			(Field::Latitude, Value::Number(48.2)),
			(Field::Longitude, Value::Number(16.37)),
		]));

		assert!(inside.matches(&near));
		assert!(!outside.matches(&near));
		assert!(!inside.matches(&far));
		assert!(outside.matches(&far));
		assert!(!inside.matches(&Row::default()));
		assert!(!outside.matches(&Row::default()));
	}

	#[test]
	fn orientation_compares_width_and_height() {
		let landscape = compile(&OrientationQuery { landscape: true }.into()).expect("compile");
		let portrait = compile(&OrientationQuery { landscape: false }.into()).expect("compile");
		let square = Row(HashMap::from([
			(Field::Width, Value::Number(100.0)),
			(Field::Height, Value::Number(100.0)),
		]));

		assert!(landscape.matches(&square));
		assert!(portrait.matches(&square));
	}

	#[test]
	fn some_of_is_unsupported() {
		let query = SearchQuery::some_of(Some(1), vec![text(TextKind::Caption, "a", false)]);

		assert!(matches!(compile(&query), Err(Error::UnsupportedNode { .. })));
	}

	#[test]
	fn parameter_names_are_unique_per_leaf() {
		let query = SearchQuery::and(vec![
			text(TextKind::AnyText, "summer/beach", true),
			SearchQuery::or(vec![
				RangeQuery::number(RangeKind::MinRating, 3.0).into(),
				RangeQuery::number(RangeKind::MaxRating, 4.0).into(),
				OrientationQuery { landscape: true }.into(),
				DistanceQuery {
					origin: String::new(),
					coordinates: Some(Coordinates { latitude: 1.0, longitude: 2.0 }),
					radius_km: 1.0,
					negate: false,
				}
				.into(),
			]),
			text(TextKind::Keyword, "red", false),
		]);
		let predicate = compile(&query).expect("compile");
		let mut seen = HashMap::new();

		for param in predicate.params() {
			if let Some(previous) = seen.insert(param.name.clone(), param.value.clone()) {
				assert_eq!(previous, param.value, "{} bound to two values", param.name);
			}
		}

		for name in ["text1", "fullPath1", "dirName1", "parentName1", "CtextC1", "text_exact1"] {
			assert!(seen.contains_key(name), "missing {name}");
		}
		for name in ["min2", "max3", "maxLat5", "minLon5", "text6"] {
			assert!(seen.contains_key(name), "missing {name}");
		}
	}

	#[test]
	fn counter_is_threaded_through_calls() {
		let mut counter = ParamCounter::default();
		let first =
			compile_with(&text(TextKind::Caption, "a", false), &mut counter).expect("compile");
		let second =
			compile_with(&text(TextKind::Caption, "b", false), &mut counter).expect("compile");

		assert_eq!(first.params()[0].name, "text1");
		assert_eq!(second.params()[0].name, "text2");
	}
}
