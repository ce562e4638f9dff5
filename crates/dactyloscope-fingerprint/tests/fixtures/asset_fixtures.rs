//! Asset trees on disk for precomputation and lookup tests

use std::fs;
use tempfile::TempDir;

/// A small site: stylesheet, script, nested image, extensionless file
/// and a multi-extension archive
pub fn asset_tree() -> TempDir {
	let temp_dir = TempDir::new().unwrap();
	let root = temp_dir.path();

	fs::create_dir_all(root.join("css")).unwrap();
	fs::create_dir_all(root.join("js/vendor")).unwrap();
	fs::create_dir_all(root.join("images")).unwrap();

	fs::write(root.join("css/site.css"), "body { margin: 0; }").unwrap();
	fs::write(root.join("js/app.js"), "console.log('app');").unwrap();
	fs::write(root.join("js/vendor/lib.min.js"), "var lib = {};").unwrap();
	fs::write(root.join("images/logo.png"), [0x89, b'P', b'N', b'G', 0x0d, 0x0a]).unwrap();
	fs::write(root.join("README"), "assets").unwrap();
	fs::write(root.join("archive.tar.gz"), [0x1f, 0x8b, 0x08]).unwrap();

	temp_dir
}

/// `count` distinct files spread over a few directories
pub fn numbered_files(count: usize) -> TempDir {
	let temp_dir = TempDir::new().unwrap();

	for i in 0..count {
		let dir = temp_dir.path().join(format!("d{}", i % 5));
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join(format!("file{i}.txt")), format!("content {i}")).unwrap();
	}

	temp_dir
}
