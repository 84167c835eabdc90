//! Compiled boolean conditions over media records.
//!
//! A [`Predicate`] is backend neutral: storage renders it to SQL, and [`Predicate::evaluate`]
//! runs it in memory with SQL three-valued logic so both paths agree on NULL handling.

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};
use time::OffsetDateTime;

/// Record attributes a predicate may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
	MediaName,
	Caption,
	/// Comma-joined keyword list.
	Keywords,
	/// Comma-joined person name list.
	Persons,
	Country,
	State,
	City,
	Latitude,
	Longitude,
	CreationDate,
	Rating,
	Width,
	Height,
	DirectoryName,
	DirectoryPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
	Field(Field),
	/// `width * height`.
	PixelArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
	Lt,
	Le,
	Gt,
	Ge,
}
impl CompareOp {
	pub fn as_sql(self) -> &'static str {
		match self {
			Self::Lt => "<",
			Self::Le => "<=",
			Self::Gt => ">",
			Self::Ge => ">=",
		}
	}

	fn holds(self, ordering: Ordering) -> bool {
		match self {
			Self::Lt => ordering == Ordering::Less,
			Self::Le => ordering != Ordering::Greater,
			Self::Gt => ordering == Ordering::Greater,
			Self::Ge => ordering != Ordering::Less,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
	Text(String),
	Number(f64),
	Timestamp(OffsetDateTime),
}

/// A named bind parameter. Names are unique within one compiled tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
	pub name: String,
	pub value: ParamValue,
}
impl Param {
	pub fn text(name: String, value: impl Into<String>) -> Self {
		Self { name, value: ParamValue::Text(value.into()) }
	}

	pub fn number(name: String, value: f64) -> Self {
		Self { name, value: ParamValue::Number(value) }
	}

	pub fn timestamp(name: String, value: OffsetDateTime) -> Self {
		Self { name, value: ParamValue::Timestamp(value) }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
	/// Empty conjunction is true.
	And(Vec<Predicate>),
	/// Empty disjunction is false.
	Or(Vec<Predicate>),
	Compare { lhs: Operand, op: CompareOp, param: Param },
	ColumnCompare { lhs: Field, op: CompareOp, rhs: Field },
	/// Case-insensitive pattern match; `%` and `_` are wildcards, `\` escapes.
	Like { field: Field, negated: bool, param: Param },
	IsNull(Field),
}
impl Predicate {
	/// SQL three-valued evaluation: `None` is UNKNOWN.
	pub fn evaluate<R>(&self, record: &R) -> Option<bool>
	where
		R: Record + ?Sized,
	{
		match self {
			Self::And(children) => {
				let mut unknown = false;

				for child in children {
					match child.evaluate(record) {
						Some(false) => return Some(false),
						None => unknown = true,
						Some(true) => {},
					}
				}

				if unknown { None } else { Some(true) }
			},
			Self::Or(children) => {
				let mut unknown = false;

				for child in children {
					match child.evaluate(record) {
						Some(true) => return Some(true),
						None => unknown = true,
						Some(false) => {},
					}
				}

				if unknown { None } else { Some(false) }
			},
			Self::Compare { lhs, op, param } => {
				let lhs = operand_value(record, *lhs);

				compare(&lhs, &param.value).map(|ordering| op.holds(ordering))
			},
			Self::ColumnCompare { lhs, op, rhs } => {
				let (Value::Number(lhs), Value::Number(rhs)) = (record.value(*lhs), record.value(*rhs))
				else {
					return None;
				};

				lhs.partial_cmp(&rhs).map(|ordering| op.holds(ordering))
			},
			Self::Like { field, negated, param } => {
				let (Value::Text(value), ParamValue::Text(pattern)) =
					(record.value(*field), &param.value)
				else {
					return None;
				};

				Some(like_match(value, pattern) != *negated)
			},
			Self::IsNull(field) => Some(matches!(record.value(*field), Value::Null)),
		}
	}

	/// True when a `WHERE` clause built from this predicate keeps the record.
	pub fn matches<R>(&self, record: &R) -> bool
	where
		R: Record + ?Sized,
	{
		self.evaluate(record) == Some(true)
	}

	pub fn params(&self) -> Vec<&Param> {
		let mut out = Vec::new();

		self.collect_params(&mut out);

		out
	}

	fn collect_params<'a>(&'a self, out: &mut Vec<&'a Param>) {
		match self {
			Self::And(children) | Self::Or(children) =>
				children.iter().for_each(|child| child.collect_params(out)),
			Self::Compare { param, .. } | Self::Like { param, .. } => out.push(param),
			Self::ColumnCompare { .. } | Self::IsNull(_) => {},
		}
	}
}

/// A field value as seen by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
	Null,
	Text(&'a str),
	Number(f64),
	Timestamp(OffsetDateTime),
}

/// Anything that can expose media fields to [`Predicate::evaluate`].
pub trait Record {
	fn value(&self, field: Field) -> Value<'_>;
}

/// Escapes `\`, `%` and `_` so `text` matches itself literally inside a LIKE pattern.
pub fn escape_like(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for ch in text.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}

/// Case-insensitive LIKE with `\` as the escape character.
pub fn like_match(value: &str, pattern: &str) -> bool {
	like_regex(pattern).map(|re| re.is_match(value)).unwrap_or(false)
}

/// Translates a LIKE pattern into an anchored, case-insensitive regex.
///
/// `%` becomes `.*` and `_` becomes `.`; everything else, including escaped wildcards, is matched
/// literally. A trailing escape matches a literal backslash.
pub fn like_regex(pattern: &str) -> Result<Regex, regex::Error> {
	let mut source = String::with_capacity(pattern.len() + 8);
	let mut chars = pattern.chars();

	source.push('^');

	while let Some(ch) = chars.next() {
		match ch {
			'%' => source.push_str(".*"),
			'_' => source.push('.'),
			'\\' => source.push_str(&regex::escape(&chars.next().unwrap_or('\\').to_string())),
			other => source.push_str(&regex::escape(&other.to_string())),
		}
	}

	source.push('$');

	RegexBuilder::new(&source).case_insensitive(true).dot_matches_new_line(true).build()
}

fn operand_value<R>(record: &R, operand: Operand) -> Value<'_>
where
	R: Record + ?Sized,
{
	match operand {
		Operand::Field(field) => record.value(field),
		Operand::PixelArea => match (record.value(Field::Width), record.value(Field::Height)) {
			(Value::Number(width), Value::Number(height)) => Value::Number(width * height),
			_ => Value::Null,
		},
	}
}

fn compare(lhs: &Value<'_>, rhs: &ParamValue) -> Option<Ordering> {
	match (lhs, rhs) {
		(Value::Number(lhs), ParamValue::Number(rhs)) => lhs.partial_cmp(rhs),
		(Value::Timestamp(lhs), ParamValue::Timestamp(rhs)) => Some(lhs.cmp(rhs)),
		(Value::Text(lhs), ParamValue::Text(rhs)) => Some((*lhs).cmp(rhs.as_str())),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use crate::predicate::{
		CompareOp, Field, Operand, Param, Predicate, Record, Value, escape_like, like_match,
		like_regex,
	};

	#[derive(Default)]
	struct Row(HashMap<Field, Value<'static>>);
	impl Record for Row {
		fn value(&self, field: Field) -> Value<'_> {
			self.0.get(&field).copied().unwrap_or(Value::Null)
		}
	}

	fn row(values: &[(Field, Value<'static>)]) -> Row {
		Row(values.iter().copied().collect())
	}

	fn like(field: Field, negated: bool, pattern: &str) -> Predicate {
		Predicate::Like { field, negated, param: Param::text("p".to_string(), pattern) }
	}

	#[test]
	fn like_handles_wildcards_and_case() {
		assert!(like_match("Sunset over Lake", "%sunset%"));
		assert!(like_match("sunset", "SUNSET"));
		assert!(like_match("red,blue,green", "%,blue,%"));
		assert!(like_match("abc", "a_c"));
		assert!(like_match("", "%"));
		assert!(!like_match("abc", "a_"));
		assert!(!like_match("abc", "%d%"));
		assert!(like_match("aXbXc", "%b%c"));
		assert!(!like_match("red", "ed"));
		assert!(like_match("first line\nsecond", "first%second"));
		assert!(like_match("ÁRVÍZTŰRŐ", "%árvíz%"));
	}

	#[test]
	fn like_pattern_translates_to_anchored_regex() {
		assert_eq!(like_regex("a%b_c.").expect("regex").as_str(), "^a.*b.c\\.$");
		assert_eq!(like_regex("50\\%").expect("regex").as_str(), "^50%$");
		assert_eq!(like_regex("end\\").expect("regex").as_str(), "^end\\\\$");
		assert!(!like_match("(a+)", "(a)"));
		assert!(like_match("(a+)", "(A+)"));
	}

	#[test]
	fn escaped_wildcards_match_literally() {
		let pattern = format!("%{}%", escape_like("50%_off"));

		assert_eq!(escape_like("a\\b%c_d"), "a\\\\b\\%c\\_d");
		assert!(like_match("summer 50%_off sale", &pattern));
		assert!(!like_match("summer 50 percent off", &pattern));
		assert!(like_match("C:\\photos", &escape_like("c:\\photos")));
	}

	#[test]
	fn null_fields_are_unknown_for_comparisons() {
		let empty = Row::default();
		let negated = like(Field::Keywords, true, "%red%");

		assert_eq!(negated.evaluate(&empty), None);
		assert!(!negated.matches(&empty));

		let with_null_check = Predicate::Or(vec![negated, Predicate::IsNull(Field::Keywords)]);

		assert!(with_null_check.matches(&empty));
	}

	#[test]
	fn connectives_follow_kleene_logic() {
		let record = row(&[(Field::Caption, Value::Text("sunset"))]);
		let hit = like(Field::Caption, false, "%sun%");
		let unknown = like(Field::City, false, "%x%");
		let miss = like(Field::Caption, false, "%moon%");

		assert_eq!(Predicate::And(vec![hit.clone(), unknown.clone()]).evaluate(&record), None);
		assert_eq!(
			Predicate::And(vec![miss.clone(), unknown.clone()]).evaluate(&record),
			Some(false)
		);
		assert_eq!(Predicate::Or(vec![hit, unknown.clone()]).evaluate(&record), Some(true));
		assert_eq!(Predicate::Or(vec![miss, unknown]).evaluate(&record), None);
		assert_eq!(Predicate::And(Vec::new()).evaluate(&record), Some(true));
		assert_eq!(Predicate::Or(Vec::new()).evaluate(&record), Some(false));
	}

	#[test]
	fn pixel_area_and_column_comparisons() {
		let record =
			row(&[(Field::Width, Value::Number(4_000.0)), (Field::Height, Value::Number(3_000.0))]);
		let at_least_12mp = Predicate::Compare {
			lhs: Operand::PixelArea,
			op: CompareOp::Ge,
			param: Param::number("min1".to_string(), 12_000_000.0),
		};
		let landscape =
			Predicate::ColumnCompare { lhs: Field::Width, op: CompareOp::Ge, rhs: Field::Height };
		let portrait =
			Predicate::ColumnCompare { lhs: Field::Width, op: CompareOp::Le, rhs: Field::Height };

		assert!(at_least_12mp.matches(&record));
		assert!(landscape.matches(&record));
		assert!(!portrait.matches(&record));
		assert_eq!(at_least_12mp.evaluate(&Row::default()), None);
	}

	#[test]
	fn params_are_collected_depth_first() {
		let predicate = Predicate::And(vec![
			like(Field::Caption, false, "a"),
			Predicate::Or(vec![Predicate::IsNull(Field::City), Predicate::Compare {
				lhs: Operand::Field(Field::Rating),
				op: CompareOp::Gt,
				param: Param::number("max2".to_string(), 3.0),
			}]),
		]);
		let names =
			predicate.params().into_iter().map(|param| param.name.as_str()).collect::<Vec<_>>();

		assert_eq!(names, ["p", "max2"]);
	}
}
