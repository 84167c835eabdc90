//! Attaches gazetteer coordinates to distance nodes.

use gallery_config::GazetteerProviderConfig;
use gallery_domain::query::{ListQuery, SearchQuery};

use crate::{BoxFuture, Error, Gazetteer, Result};

/// Resolves every distance node with a non-empty origin, walking through list children.
///
/// Nodes that already carry coordinates are resolved again.
pub fn resolve_distances<'a>(
	gazetteer: &'a dyn Gazetteer,
	cfg: &'a GazetteerProviderConfig,
	query: SearchQuery,
) -> BoxFuture<'a, Result<SearchQuery>> {
	Box::pin(async move {
		match query {
			SearchQuery::List(ListQuery { kind, children }) => {
				let mut resolved = Vec::with_capacity(children.len());

				for child in children {
					resolved.push(resolve_distances(gazetteer, cfg, child).await?);
				}

				Ok(SearchQuery::List(ListQuery { kind, children: resolved }))
			},
			SearchQuery::Distance(mut distance) if !distance.origin.trim().is_empty() => {
				let place = distance.origin.trim();
				let Some(coordinates) = gazetteer.resolve(cfg, place).await? else {
					return Err(Error::GeoResolutionNotFound { place: place.to_string() });
				};

				tracing::debug!(
					place,
					latitude = coordinates.latitude,
					longitude = coordinates.longitude,
					"Resolved distance origin."
				);

				distance.coordinates = Some(coordinates);

				Ok(SearchQuery::Distance(distance))
			},
			other => Ok(other),
		}
	})
}
