use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Reads a whole source text into memory.
///
/// Failures are reported as `Error::Resource` carrying the offending path,
/// since there is no fallback text to render instead.
pub(crate) fn read_source<P: AsRef<Path>>(path: P) -> Result<String> {
	let path = path.as_ref();
	fs::read_to_string(path).map_err(|source| Error::Resource { path: path.to_path_buf(), source })
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `texts/one.txt` + `"graph.bin"` → `texts/one.graph.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| Error::Config(format!("path has no filename: {}", input_path.display())))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Resolves `path` against the directory holding `anchor_file`.
///
/// - Absolute paths are returned as-is
/// - Relative paths are joined onto the anchor's parent (not canonicalized)
pub(crate) fn resolve_beside<P: AsRef<Path>, Q: AsRef<Path>>(anchor_file: P, path: Q) -> PathBuf {
	let path = path.as_ref();
	if path.is_absolute() {
		return path.to_path_buf();
	}
	match anchor_file.as_ref().parent() {
		Some(parent) => parent.join(path),
		None => path.to_path_buf(),
	}
}

/// A snapshot is fresh when it exists and is not older than the file it was derived from.
pub(crate) fn snapshot_is_fresh(origin: &Path, snapshot: &Path) -> bool {
	let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified()).ok();
	match (modified(origin), modified(snapshot)) {
		(Some(origin_time), Some(snapshot_time)) => snapshot_time >= origin_time,
		_ => false,
	}
}

/// Loads a postcard snapshot.
///
/// Returns `Ok(None)` when no snapshot exists yet.
pub(crate) fn read_snapshot<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Option<T>> {
	let path = path.as_ref();
	if !path.exists() {
		return Ok(None);
	}
	let bytes = fs::read(path)?;
	Ok(Some(postcard::from_bytes(&bytes)?))
}

/// Serializes `value` with postcard and writes it to `path`, replacing any previous snapshot.
pub(crate) fn write_snapshot<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
	let bytes = postcard::to_stdvec(value)?;
	fs::write(path, bytes)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn output_path_replaces_extension() {
		let out = build_output_path("texts/one.txt", "graph.bin").unwrap();
		assert_eq!(out, PathBuf::from("texts/one.graph.bin"));
	}

	#[test]
	fn resolve_beside_joins_relative_paths() {
		assert_eq!(resolve_beside("data/book.json", "texts"), PathBuf::from("data/texts"));
		assert_eq!(resolve_beside("book.json", "texts"), PathBuf::from("texts"));
	}

	#[test]
	fn missing_source_is_a_resource_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = read_source(dir.path().join("absent.txt")).unwrap_err();
		assert!(matches!(err, Error::Resource { .. }));
	}

	#[test]
	fn missing_snapshot_reads_as_none() {
		let dir = tempfile::tempdir().unwrap();
		let loaded: Option<Vec<u32>> = read_snapshot(dir.path().join("none.bin")).unwrap();
		assert!(loaded.is_none());
	}

	#[test]
	fn snapshot_survives_a_write() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("values.bin");
		write_snapshot(&path, &vec![3u32, 1, 4]).unwrap();
		let loaded: Option<Vec<u32>> = read_snapshot(&path).unwrap();
		assert_eq!(loaded, Some(vec![3, 1, 4]));
	}
}
