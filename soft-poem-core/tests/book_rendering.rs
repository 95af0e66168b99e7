//! End-to-end tests: configuration file → book → seeded renders.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use soft_poem_core::{Book, BookConfig, Error, seeded_rng};

const TIDE: &str = "the tide comes in , the tide goes out . |||
salt on the stones --- salt on the tongue ,
and the gulls say nothing , nothing at all .";

const LANTERN: &str = "a lantern in the orchard ; a lantern in the rain ---
who carries it ? ||| nobody , nobody carries it .";

fn write_book(dir: &Path, extra: &str) -> std::path::PathBuf {
	let texts = dir.join("texts");
	fs::create_dir_all(&texts).unwrap();
	fs::write(texts.join("tide.txt"), TIDE).unwrap();
	fs::write(texts.join("lantern.txt"), LANTERN).unwrap();

	let config = format!(
		r#"{{
			{extra}
			"poems": [
				{{"immutable_id": 1, "name": "tide", "filename": "tide.txt", "mutable_chance": 0.5, "position_weight": 3.0}},
				{{"immutable_id": 2, "filename": "lantern.txt", "mutable_chance": 1.0, "position_weight": 1.0,
				  "distance_weights": {{"-2": 30, "1": 1000, "2": 40, "3": 20}}}}
			]
		}}"#
	);
	let path = dir.join("book.json");
	fs::write(&path, config).unwrap();
	path
}

#[test]
fn same_seed_renders_the_same_book() {
	let dir = tempfile::tempdir().unwrap();
	let config = BookConfig::from_file(write_book(dir.path(), "")).unwrap();
	let book = Book::from_config(&config, &mut seeded_rng(100)).unwrap();

	for seed in [0, 1, 42, 1_000_000_000_000] {
		assert_eq!(book.render_seeded(seed).unwrap(), book.render_seeded(seed).unwrap());
	}
}

#[test]
fn every_poem_is_rendered_once() {
	let dir = tempfile::tempdir().unwrap();
	let config = BookConfig::from_file(write_book(dir.path(), "")).unwrap();
	let book = Book::from_config(&config, &mut seeded_rng(7)).unwrap();

	let rendered = book.render_seeded(9).unwrap();
	let mut ids: Vec<u64> = rendered.iter().map(|poem| poem.immutable_id).collect();
	ids.sort_unstable();
	assert_eq!(ids, vec![1, 2]);
	assert!(rendered.iter().all(|poem| poem.body.starts_with(r#"<div class="poem-line">"#)));
	assert!(rendered.iter().any(|poem| poem.name == "tide"));
	assert!(rendered.iter().any(|poem| poem.name == "2"));
}

#[test]
fn source_dir_is_relative_to_the_config() {
	let dir = tempfile::tempdir().unwrap();
	let config = BookConfig::from_file(write_book(dir.path(), "")).unwrap();
	assert_eq!(config.source_dir, dir.path().join("texts"));
}

#[test]
fn snapshot_freezes_the_book() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_book(dir.path(), r#""cache_graphs": true,"#);

	let built = Book::load_or_build(&path, &mut seeded_rng(5)).unwrap();
	assert!(dir.path().join("book.bin").exists());
	// A different generator would give different constants if the book were rebuilt.
	let loaded = Book::load_or_build(&path, &mut seeded_rng(6)).unwrap();
	assert_eq!(built, loaded);

	let first = loaded.render_seeded(3).unwrap();
	assert!(dir.path().join("texts").join("lantern.graph.bin").exists());
	assert_eq!(first, built.render_seeded(3).unwrap());
}

#[test]
fn missing_text_fails_the_render() {
	let dir = tempfile::tempdir().unwrap();
	let config = BookConfig::from_file(write_book(dir.path(), "")).unwrap();
	fs::remove_file(dir.path().join("texts").join("lantern.txt")).unwrap();
	let book = Book::from_config(&config, &mut seeded_rng(1)).unwrap();

	assert!(matches!(book.render_seeded(1), Err(Error::Resource { .. })));
}

#[test]
fn malformed_config_is_reported() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("book.json");
	fs::write(&path, r#"{"poems": [{"filename": "no-id.txt"}]}"#).unwrap();
	assert!(matches!(BookConfig::from_file(&path), Err(Error::Json(_))));
}
