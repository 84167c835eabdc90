pub mod autocomplete;
pub mod media;
pub mod search;

mod error;

pub use autocomplete::AutoCompleteItem;
pub use error::{Error, Result};
pub use media::{DirectoryRef, FaceBox, FaceRegion, Media, MediaMetadata, PersonRef, PositionData};
pub use search::SearchResult;

use std::{future::Future, pin::Pin, sync::Arc};

use gallery_config::{Config, GazetteerProviderConfig};
use gallery_domain::{geo::Coordinates, predicate::Predicate};
use gallery_providers::gazetteer;
use gallery_storage::{
	catalog::{self, LookupField, Selection},
	db::Db,
	models::{MediaFaceRow, PositionRow},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read access to the media catalog.
pub trait Catalog
where
	Self: Send + Sync,
{
	/// Rows of media matching `predicate`, left-joined with faces and persons and sorted by media
	/// id then face id.
	fn media_rows<'a>(
		&'a self,
		predicate: &'a Predicate,
		selection: Selection,
	) -> BoxFuture<'a, Result<Vec<MediaFaceRow>>>;

	/// Distinct values of `field` containing `text`, case-insensitively.
	fn match_field<'a>(
		&'a self,
		field: LookupField,
		text: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>>;

	fn match_positions<'a>(
		&'a self,
		text: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<PositionRow>>>;
}

/// Place-name to coordinates lookup.
pub trait Gazetteer
where
	Self: Send + Sync,
{
	fn resolve<'a>(
		&'a self,
		cfg: &'a GazetteerProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<Option<Coordinates>>>;
}

/// [`Catalog`] over the PostgreSQL schema in `sql/`.
pub struct PgCatalog {
	pub db: Db,
}
impl Catalog for PgCatalog {
	fn media_rows<'a>(
		&'a self,
		predicate: &'a Predicate,
		selection: Selection,
	) -> BoxFuture<'a, Result<Vec<MediaFaceRow>>> {
		Box::pin(async move { Ok(catalog::media_rows(&self.db, predicate, selection).await?) })
	}

	fn match_field<'a>(
		&'a self,
		field: LookupField,
		text: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move { Ok(catalog::match_field(&self.db, field, text, limit).await?) })
	}

	fn match_positions<'a>(
		&'a self,
		text: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<PositionRow>>> {
		Box::pin(async move { Ok(catalog::match_positions(&self.db, text, limit).await?) })
	}
}

struct HttpGazetteer;
impl Gazetteer for HttpGazetteer {
	fn resolve<'a>(
		&'a self,
		cfg: &'a GazetteerProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<Option<Coordinates>>> {
		Box::pin(async move { Ok(gazetteer::resolve(cfg, text).await?) })
	}
}

pub struct GalleryService {
	pub cfg: Config,
	pub catalog: Arc<dyn Catalog>,
	pub gazetteer: Arc<dyn Gazetteer>,
}
impl GalleryService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, catalog: Arc::new(PgCatalog { db }), gazetteer: Arc::new(HttpGazetteer) }
	}

	pub fn with_collaborators(
		cfg: Config,
		catalog: Arc<dyn Catalog>,
		gazetteer: Arc<dyn Gazetteer>,
	) -> Self {
		Self { cfg, catalog, gazetteer }
	}
}
