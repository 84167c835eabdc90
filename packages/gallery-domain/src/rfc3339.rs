//! Serde adapter writing [`OffsetDateTime`] values as RFC 3339 strings.

use serde::{Deserialize, Deserializer, Serializer};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;

	serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	OffsetDateTime::parse(raw.trim(), &Rfc3339).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
	use serde::{Deserialize, Serialize};
	use time::{OffsetDateTime, macros::datetime};

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Stamp {
		#[serde(with = "crate::rfc3339")]
		at: OffsetDateTime,
	}

	#[test]
	fn writes_and_reads_offsets() {
		let stamp = Stamp { at: datetime!(2021-03-04 05:06:07 +02:00) };
		let json = serde_json::to_value(&stamp).expect("serialize");

		assert_eq!(json, serde_json::json!({ "at": "2021-03-04T05:06:07+02:00" }));
		assert_eq!(serde_json::from_value::<Stamp>(json).expect("deserialize"), stamp);
	}

	#[test]
	fn rejects_dates_without_time() {
		let raw = serde_json::json!({ "at": "2021-03-04" });

		assert!(serde_json::from_value::<Stamp>(raw).is_err());
	}
}
