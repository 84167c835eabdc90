pub mod assemble;
pub mod compile;
pub mod geo;

use serde::{Deserialize, Serialize};

use gallery_domain::{normalize, predicate::Predicate, query::SearchQuery};
use gallery_storage::catalog::Selection;

use crate::{
	GalleryService, Result,
	media::{DirectoryRef, Media},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	/// The query as submitted, before normalization and geo resolution.
	pub search_query: SearchQuery,
	pub media: Vec<Media>,
	/// Always empty for predicate searches.
	pub directories: Vec<DirectoryRef>,
	/// Always empty for predicate searches.
	pub meta_files: Vec<String>,
	/// More media matched than `search.max_media_result`; `media` holds the first ones by id.
	pub result_overflow: bool,
}

impl GalleryService {
	pub async fn search(&self, query: SearchQuery) -> Result<SearchResult> {
		let cap = self.cfg.search.max_media_result;
		let predicate = self.prepare(query.clone()).await?;
		let rows =
			self.catalog.media_rows(&predicate, Selection::First(cap.saturating_add(1))).await?;
		let mut media = assemble::assemble(rows)?;
		let result_overflow = media.len() > cap as usize;

		if result_overflow {
			tracing::warn!(cap, "Search matched more media than the configured cap.");

			media.truncate(cap as usize);
		}

		tracing::debug!(media = media.len(), result_overflow, "Search completed.");

		Ok(SearchResult {
			search_query: query,
			media,
			directories: Vec::new(),
			meta_files: Vec::new(),
			result_overflow,
		})
	}

	/// One uniformly chosen media matching `query`, if any.
	pub async fn random_match(&self, query: SearchQuery) -> Result<Option<Media>> {
		let predicate = self.prepare(query).await?;
		let rows = self.catalog.media_rows(&predicate, Selection::Random).await?;

		Ok(assemble::assemble(rows)?.into_iter().next())
	}

	/// Normalizes, resolves distance origins and compiles `query`.
	async fn prepare(&self, query: SearchQuery) -> Result<Predicate> {
		let normalized =
			normalize::normalize(query, u64::from(self.cfg.search.max_some_of_combinations))?;
		let resolved = geo::resolve_distances(
			self.gazetteer.as_ref(),
			&self.cfg.providers.gazetteer,
			normalized,
		)
		.await?;
		let predicate = compile::compile(&resolved)?;

		tracing::debug!(params = predicate.params().len(), "Compiled search predicate.");

		Ok(predicate)
	}
}
