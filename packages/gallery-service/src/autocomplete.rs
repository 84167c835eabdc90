//! Per-category suggestion lookups merged into one deduplicated list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use gallery_domain::query::SearchQueryKind;
use gallery_storage::{catalog::LookupField, models::PositionRow};

use crate::{GalleryService, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AutoCompleteItem {
	pub value: String,
	#[serde(rename = "type")]
	pub category: SearchQueryKind,
}
impl AutoCompleteItem {
	pub fn new(value: impl Into<String>, category: SearchQueryKind) -> Self {
		Self { value: value.into(), category }
	}
}

impl GalleryService {
	/// Suggestions containing `text` for every category `filter` selects.
	///
	/// Categories are emitted in a fixed order (keyword, person, position, file name, caption,
	/// directory) and only the first occurrence of an item is kept.
	pub async fn autocomplete(
		&self,
		text: &str,
		filter: SearchQueryKind,
	) -> Result<Vec<AutoCompleteItem>> {
		let limit = self.cfg.search.autocomplete.max_items_per_category;
		let wants =
			|category: SearchQueryKind| filter == SearchQueryKind::AnyText || filter == category;
		let wants_positions =
			wants(SearchQueryKind::Position) || filter == SearchQueryKind::Distance;
		let (keywords, persons, positions, file_names, captions, directories) = tokio::try_join!(
			self.lookup(wants(SearchQueryKind::Keyword), LookupField::Keywords, text, limit),
			self.lookup(wants(SearchQueryKind::Person), LookupField::PersonName, text, limit),
			self.positions(wants_positions, text, limit),
			self.lookup(wants(SearchQueryKind::FileName), LookupField::MediaName, text, limit),
			self.lookup(wants(SearchQueryKind::Caption), LookupField::Caption, text, limit),
			self.lookup(wants(SearchQueryKind::Directory), LookupField::DirectoryName, text, limit),
		)?;
		let position_category = if filter == SearchQueryKind::Distance {
			SearchQueryKind::Distance
		} else {
			SearchQueryKind::Position
		};
		let mut items = Vec::new();

		for list in keywords {
			items.extend(
				list.split(',')
					.filter(|keyword| !keyword.is_empty() && contains_ignore_case(keyword, text))
					.map(|keyword| AutoCompleteItem::new(keyword, SearchQueryKind::Keyword)),
			);
		}

		items.extend(
			persons.into_iter().map(|name| AutoCompleteItem::new(name, SearchQueryKind::Person)),
		);

		for PositionRow { country, state, city } in positions {
			items.extend(
				[city, country, state]
					.into_iter()
					.flatten()
					.filter(|value| !value.is_empty() && contains_ignore_case(value, text))
					.map(|value| AutoCompleteItem::new(value, position_category)),
			);
		}

		items.extend(
			file_names
				.into_iter()
				.map(|name| AutoCompleteItem::new(name, SearchQueryKind::FileName)),
		);
		items.extend(
			captions
				.into_iter()
				.map(|caption| AutoCompleteItem::new(caption, SearchQueryKind::Caption)),
		);
		items.extend(
			directories
				.into_iter()
				.map(|name| AutoCompleteItem::new(name, SearchQueryKind::Directory)),
		);

		Ok(dedup_first_seen(items))
	}

	async fn lookup(
		&self,
		enabled: bool,
		field: LookupField,
		text: &str,
		limit: u32,
	) -> Result<Vec<String>> {
		if !enabled {
			return Ok(Vec::new());
		}

		self.catalog.match_field(field, text, limit).await
	}

	async fn positions(&self, enabled: bool, text: &str, limit: u32) -> Result<Vec<PositionRow>> {
		if !enabled {
			return Ok(Vec::new());
		}

		self.catalog.match_positions(text, limit).await
	}
}

fn contains_ignore_case(value: &str, text: &str) -> bool {
	value.to_lowercase().contains(&text.to_lowercase())
}

fn dedup_first_seen(items: Vec<AutoCompleteItem>) -> Vec<AutoCompleteItem> {
	let mut seen = HashSet::with_capacity(items.len());

	items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}
