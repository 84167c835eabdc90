/// A directory reference split into its last component and the prefix leading to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPath {
	/// `/`-separated form of the input, with backslashes rewritten.
	pub full: String,
	pub name: String,
	/// Everything up to and including the last separator, when the input has one.
	pub parent: Option<String>,
}

/// Splits a user-supplied directory reference on its last separator.
///
/// Both `\` and `/` are accepted as separators so `a\b` and `a/b` decompose the same way. A
/// trailing separator is ignored when choosing the name.
pub fn decompose(raw: &str) -> DirectoryPath {
	let full = normalize_separators(raw);
	let trimmed = full.trim_end_matches('/');

	match trimmed.rfind('/') {
		Some(index) => DirectoryPath {
			name: trimmed[index + 1..].to_string(),
			parent: Some(trimmed[..=index].to_string()),
			full,
		},
		None => DirectoryPath { name: trimmed.to_string(), parent: None, full },
	}
}

pub fn normalize_separators(raw: &str) -> String {
	raw.replace('\\', "/")
}
