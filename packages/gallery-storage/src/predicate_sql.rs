//! Renders a compiled [`Predicate`] into a Postgres `WHERE` fragment.
//!
//! Media columns are addressed through the `media` alias and directory columns through
//! `directory`, so callers must join with those names.

use sqlx::{Postgres, QueryBuilder};

use gallery_domain::predicate::{Field, Operand, ParamValue, Predicate};

pub fn column(field: Field) -> &'static str {
	match field {
		Field::MediaName => "media.name",
		Field::Caption => "media.caption",
		Field::Keywords => "media.keywords",
		Field::Persons => "media.persons",
		Field::Country => "media.country",
		Field::State => "media.state",
		Field::City => "media.city",
		Field::Latitude => "media.latitude",
		Field::Longitude => "media.longitude",
		Field::CreationDate => "media.creation_date",
		Field::Rating => "media.rating",
		Field::Width => "media.width",
		Field::Height => "media.height",
		Field::DirectoryName => "directory.name",
		Field::DirectoryPath => "directory.path",
	}
}

pub fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
	match predicate {
		Predicate::And(children) => push_connective(builder, children, " AND ", "TRUE"),
		Predicate::Or(children) => push_connective(builder, children, " OR ", "FALSE"),
		Predicate::Compare { lhs, op, param } => {
			push_operand(builder, *lhs);
			builder.push(" ").push(op.as_sql()).push(" ");
			push_value(builder, &param.value);
		},
		Predicate::ColumnCompare { lhs, op, rhs } => {
			builder.push(column(*lhs)).push(" ").push(op.as_sql()).push(" ").push(column(*rhs));
		},
		Predicate::Like { field, negated, param } => {
			builder.push(column(*field)).push(if *negated { " NOT ILIKE " } else { " ILIKE " });
			push_value(builder, &param.value);
			builder.push(" ESCAPE '\\'");
		},
		Predicate::IsNull(field) => {
			builder.push(column(*field)).push(" IS NULL");
		},
	}
}

fn push_connective(
	builder: &mut QueryBuilder<'_, Postgres>,
	children: &[Predicate],
	separator: &str,
	empty: &str,
) {
	if children.is_empty() {
		builder.push(empty);

		return;
	}

	builder.push("(");

	for (index, child) in children.iter().enumerate() {
		if index > 0 {
			builder.push(separator);
		}

		push_predicate(builder, child);
	}

	builder.push(")");
}

fn push_operand(builder: &mut QueryBuilder<'_, Postgres>, operand: Operand) {
	match operand {
		Operand::Field(field) => {
			builder.push(column(field));
		},
		Operand::PixelArea => {
			builder.push("(media.width::bigint * media.height::bigint)");
		},
	}
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &ParamValue) {
	match value {
		ParamValue::Text(text) => {
			builder.push_bind(text.clone());
		},
		ParamValue::Number(number) => {
			builder.push_bind(*number);
		},
		ParamValue::Timestamp(timestamp) => {
			builder.push_bind(*timestamp);
		},
	}
}

#[cfg(test)]
mod tests {
	use sqlx::{Postgres, QueryBuilder};

	use gallery_domain::predicate::{CompareOp, Field, Operand, Param, Predicate};

	use crate::predicate_sql::push_predicate;

	fn render(predicate: &Predicate) -> String {
		let mut builder = QueryBuilder::<Postgres>::new("");

		push_predicate(&mut builder, predicate);

		builder.sql().to_string()
	}

	#[test]
	fn renders_nested_connectives_with_positional_binds() {
		let predicate = Predicate::And(vec![
			Predicate::Like {
				field: Field::Caption,
				negated: false,
				param: Param::text("text1".to_string(), "%sunset%"),
			},
			Predicate::Or(vec![
				Predicate::Compare {
					lhs: Operand::Field(Field::Rating),
					op: CompareOp::Ge,
					param: Param::number("min2".to_string(), 3.0),
				},
				Predicate::IsNull(Field::Keywords),
			]),
		]);

		assert_eq!(
			render(&predicate),
			"(media.caption ILIKE $1 ESCAPE '\\' AND (media.rating >= $2 OR media.keywords IS NULL))"
		);
	}

	#[test]
	fn renders_pixel_area_and_column_comparison() {
		let predicate = Predicate::Or(vec![
			Predicate::Compare {
				lhs: Operand::PixelArea,
				op: CompareOp::Lt,
				param: Param::number("min1".to_string(), 2_000_000.0),
			},
			Predicate::ColumnCompare { lhs: Field::Width, op: CompareOp::Ge, rhs: Field::Height },
			Predicate::Like {
				field: Field::DirectoryPath,
				negated: true,
				param: Param::text("fullPath2".to_string(), "%trips%"),
			},
		]);

		assert_eq!(
			render(&predicate),
			"((media.width::bigint * media.height::bigint) < $1 OR media.width >= media.height OR directory.path NOT ILIKE $2 ESCAPE '\\')"
		);
	}

	#[test]
	fn empty_connectives_render_as_constants() {
		assert_eq!(render(&Predicate::And(Vec::new())), "TRUE");
		assert_eq!(render(&Predicate::Or(Vec::new())), "FALSE");
	}
}
