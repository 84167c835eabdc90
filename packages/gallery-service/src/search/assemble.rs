//! Rebuilds nested media from the flat media/face/person join.

use gallery_domain::geo::Coordinates;
use gallery_storage::models::MediaFaceRow;

use crate::{
	Error, Result,
	media::{DirectoryRef, FaceBox, FaceRegion, Media, MediaMetadata, PersonRef, PositionData},
};

/// Groups consecutive rows sharing a media id into one [`Media`].
///
/// Rows must be sorted by media id. A row without a face stands for a media without faces and
/// must be the only row for that media.
pub fn assemble(rows: Vec<MediaFaceRow>) -> Result<Vec<Media>> {
	let mut media = Vec::new();
	let mut open: Option<(Media, bool)> = None;

	for row in rows {
		match open.as_mut() {
			Some((current, faceless)) if current.id == row.media_id => {
				if *faceless || row.face_id.is_none() {
					return Err(Error::RowOrderingViolation {
						message: format!(
							"media {} has a face-less row next to another row.",
							row.media_id
						),
					});
				}

				current.metadata.faces.extend(face(&row));
			},
			Some((current, _)) if row.media_id < current.id => {
				return Err(Error::RowOrderingViolation {
					message: format!(
						"media {} arrived after media {}; rows must be sorted by media id.",
						row.media_id, current.id
					),
				});
			},
			_ => {
				let next = start_media(row);

				if let Some((closed, _)) = open.replace(next) {
					media.push(closed);
				}
			},
		}
	}

	if let Some((closed, _)) = open {
		media.push(closed);
	}

	Ok(media)
}

fn start_media(row: MediaFaceRow) -> (Media, bool) {
	let faces = face(&row).into_iter().collect::<Vec<_>>();
	let faceless = faces.is_empty();
	let position = position(&row);
	let MediaFaceRow {
		media_id,
		media_name,
		creation_date,
		rating,
		width,
		height,
		caption,
		keywords,
		persons,
		directory_id,
		directory_name,
		directory_path,
		..
	} = row;
	let metadata = MediaMetadata {
		creation_date,
		rating,
		width,
		height,
		caption,
		keywords: split_list(keywords.as_deref()),
		persons: split_list(persons.as_deref()),
		position,
		faces,
	};
	let directory = DirectoryRef { id: directory_id, name: directory_name, path: directory_path };

	(Media { id: media_id, name: media_name, directory, metadata }, faceless)
}

fn face(row: &MediaFaceRow) -> Option<FaceRegion> {
	let id = row.face_id?;
	let bounds = FaceBox {
		left: row.box_left.unwrap_or_default(),
		top: row.box_top.unwrap_or_default(),
		width: row.box_width.unwrap_or_default(),
		height: row.box_height.unwrap_or_default(),
	};
	let person = row.person_id.map(|person_id| PersonRef {
		id: person_id,
		name: row.person_name.clone().unwrap_or_default(),
	});

	Some(FaceRegion { id, bounds, person })
}

fn position(row: &MediaFaceRow) -> Option<PositionData> {
	let gps = match (row.latitude, row.longitude) {
		(Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
		_ => None,
	};

	if gps.is_none() && row.country.is_none() && row.state.is_none() && row.city.is_none() {
		return None;
	}

	Some(PositionData {
		country: row.country.clone(),
		state: row.state.clone(),
		city: row.city.clone(),
		gps,
	})
}

fn split_list(raw: Option<&str>) -> Vec<String> {
	raw.map(|raw| {
		raw.split(',').map(str::trim).filter(|item| !item.is_empty()).map(str::to_string).collect()
	})
	.unwrap_or_default()
}
