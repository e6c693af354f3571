use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use rstest::rstest;
use tempfile::TempDir;

use super::*;
use crate::same_module;

/// Creates a source tree containing `files` (paths relative to the root).
fn tree(files: &[&str]) -> TempDir {
	let root = tempfile::tempdir().expect("must create tempdir");
	for rel in files {
		let path = root.path().join(rel);
		fs::create_dir_all(path.parent().unwrap()).expect("must create key directory");
		fs::write(&path, format!("/* {rel} */\n")).expect("must create source file");
	}
	root
}

fn rel(root: &TempDir, path: &Path) -> PathBuf {
	path.strip_prefix(root.path()).unwrap().to_path_buf()
}

fn chosen(root: &TempDir, selection: &BuildSelection, module: &str) -> PathBuf {
	rel(root, selection.get(module).unwrap_or_else(|| panic!("{module} not selected")))
}

#[test]
fn feature_directory_beats_platform_directory() {
	let root = tree(&["linux/amd64/aes_ni/aes.c", "linux/aes.c"]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();

	let selection = catalog.select(Platform::Linux, Arch::Amd64, [Feature::AesNi]);
	assert_eq!(chosen(&root, &selection, "aes.c"), Path::new("linux/amd64/aes_ni/aes.c"));
	assert_eq!(selection.len(), 1);
}

#[test]
fn disabled_feature_directory_is_ignored() {
	let root = tree(&["linux/amd64/aes_ni/aes.c", "linux/aes.c"]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();

	let selection = catalog.select(Platform::Linux, Arch::Amd64, []);
	assert_eq!(chosen(&root, &selection, "aes.c"), Path::new("linux/aes.c"));
}

#[test]
fn enabled_feature_beats_bare_arch_directory() {
	let root = tree(&["linux/amd64/aes_ni/aes.c", "linux/amd64/aes.c", "aes.c"]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();

	let selection = catalog.select(Platform::Linux, Arch::Amd64, [Feature::AesNi]);
	assert_eq!(chosen(&root, &selection, "aes.c"), Path::new("linux/amd64/aes_ni/aes.c"));
}

#[test]
fn feature_sources_stay_bound_to_their_arch() {
	let root = tree(&["win32/amd64/aes_ni/aes.c", "aes.c"]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();

	let selection = catalog.select(Platform::Win32, Arch::Generic, [Feature::AesNi]);
	assert_eq!(chosen(&root, &selection, "aes.c"), Path::new("aes.c"));

	let selection = catalog.select(Platform::Linux, Arch::Amd64, [Feature::AesNi]);
	assert_eq!(chosen(&root, &selection, "aes.c"), Path::new("aes.c"));
}

#[rstest]
#[case(Platform::Linux, Arch::Amd64, "linux/amd64/rc4.c")]
#[case(Platform::Linux, Arch::Generic, "linux/rc4.c")]
#[case(Platform::Darwin, Arch::Amd64, "rc4.c")]
#[case(Platform::Generic, Arch::Generic, "rc4.c")]
fn specificity_falls_back_tier_by_tier(#[case] platform: Platform, #[case] arch: Arch, #[case] expected: &str) {
	let root = tree(&["linux/amd64/rc4.c", "linux/rc4.c", "rc4.c"]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();

	let selection = catalog.select(platform, arch, []);
	assert_eq!(chosen(&root, &selection, "rc4.c"), Path::new(expected));
}

#[rstest]
fn generic_root_file_is_the_last_resort(
	#[values(Platform::Generic, Platform::Linux, Platform::Win32, Platform::Openbsd)] platform: Platform,
	#[values(Arch::Generic, Arch::Amd64)] arch: Arch,
	#[values(false, true)] aes_ni: bool,
) {
	let root = tree(&["sha1.c", "linux/os_random.c"]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();
	let features = aes_ni.then_some(Feature::AesNi);

	let selection = catalog.select(platform, arch, features);
	assert_eq!(chosen(&root, &selection, "sha1.c"), Path::new("sha1.c"));
	assert_eq!(selection.contains("os_random.c"), platform == Platform::Linux);
}

#[test]
fn generic_platform_still_honors_arch_directories() {
	let root = tree(&["amd64/rc4.c", "rc4.c"]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();

	let selection = catalog.select(Platform::Generic, Arch::Amd64, []);
	assert_eq!(chosen(&root, &selection, "rc4.c"), Path::new("amd64/rc4.c"));
}

#[test]
fn selection_order_follows_precedence_tiers() {
	let root = tree(&["utils.c", "linux/os_random.c", "linux/amd64/rc4.c", "linux/amd64/aes_ni/aes.c"]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();

	let selection = catalog.select(Platform::Linux, Arch::Amd64, [Feature::AesNi]);
	let names: Vec<String> = selection.module_names().map(ToString::to_string).collect();
	assert_eq!(names, ["aes.c", "rc4.c", "os_random.c", "utils.c"]);
}

#[test]
fn absent_directories_are_empty() {
	let root = tree(&[]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();

	for key in SelectionKey::all() {
		assert!(catalog.candidates(key).is_empty(), "{key} should have no candidates");
	}
	assert!(catalog.select(Platform::Linux, Arch::Amd64, [Feature::AesNi]).is_empty());
}

#[test]
fn missing_root_is_an_empty_catalog() {
	let root = tree(&[]);
	let catalog = SourceCatalog::scan(root.path().join("does-not-exist")).unwrap();
	assert!(catalog.select(Platform::Generic, Arch::Generic, []).is_empty());
}

#[test]
fn unlistable_directory_is_an_io_error_naming_it() {
	let root = tree(&[]);
	let dir = root.path().join("vanished");
	let err = list_files(&dir).unwrap_err();
	assert!(matches!(&err, CatalogError::Io { path, .. } if *path == dir), "{err}");
	assert!(err.to_string().contains("vanished"));
}

#[test]
fn nested_and_unrelated_directories_are_not_candidates() {
	let root = tree(&["ordo.c", "internal/mem.c", "linux/amd64/shared/extra.c", "linux/endianness.c"]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();

	let generic: Vec<_> = catalog.candidates(SelectionKey::GENERIC).iter().map(|p| rel(&root, p)).collect();
	assert_eq!(generic, [PathBuf::from("ordo.c")]);

	let selection = catalog.select(Platform::Linux, Arch::Amd64, []);
	assert!(!selection.contains("mem.c"));
	assert!(!selection.contains("extra.c"));
	assert!(selection.contains("endianness.c"));
}

#[test]
fn candidates_are_sorted_by_name() {
	let root = tree(&["linux/sys.c", "linux/endianness.c", "linux/os_random.c"]);
	let catalog = SourceCatalog::scan(root.path()).unwrap();

	let key = SelectionKey::new(Platform::Linux, Arch::Generic, Feature::Generic);
	let names: Vec<_> = catalog.candidates(key).iter().map(|p| p.file_name().unwrap().to_owned()).collect();
	assert_eq!(names, ["endianness.c", "os_random.c", "sys.c"]);
}

#[test]
fn same_module_compares_base_names() {
	assert!(same_module(Path::new("src/linux/aes.c"), Path::new("src/aes.c")));
	assert!(!same_module(Path::new("src/aes.c"), Path::new("src/aes.h")));
}

const KEY_DIRS: &[&str] = &[
	"",
	"linux",
	"linux/amd64",
	"linux/amd64/aes_ni",
	"win32",
	"win32/amd64",
	"win32/amd64/aes_ni",
	"amd64",
	"amd64/aes_ni",
];

const MODULES: &[&str] = &["aes.c", "rc4.c", "sha256.c", "os_random.c", "ordo.c"];

fn arb_layout() -> impl Strategy<Value = Vec<String>> {
	prop::collection::vec((0..KEY_DIRS.len(), 0..MODULES.len()), 0..24).prop_map(|entries| {
		let layout: HashSet<String> = entries
			.into_iter()
			.map(|(dir, module)| match KEY_DIRS[dir] {
				"" => MODULES[module].to_owned(),
				dir => format!("{dir}/{}", MODULES[module]),
			})
			.collect();
		let mut layout: Vec<_> = layout.into_iter().collect();
		layout.sort();
		layout
	})
}

fn arb_target() -> impl Strategy<Value = (Platform, Arch, Vec<Feature>)> {
	(
		prop::sample::select(vec![Platform::Generic, Platform::Linux, Platform::Win32]),
		prop::sample::select(vec![Arch::Generic, Arch::Amd64]),
		prop::sample::subsequence(vec![Feature::AesNi], 0..=1),
	)
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(48))]

	/// Selection is a pure function of the tree and yields one file per module name.
	#[test]
	fn prop_selection_is_deterministic_and_unique(layout in arb_layout(), (platform, arch, features) in arb_target()) {
		let files: Vec<&str> = layout.iter().map(String::as_str).collect();
		let root = tree(&files);

		let first = SourceCatalog::scan(root.path()).unwrap().select(platform, arch, features.clone());
		let second = SourceCatalog::scan(root.path()).unwrap().select(platform, arch, features);

		let first: Vec<PathBuf> = first.into_paths();
		prop_assert_eq!(&first, &second.into_paths());

		let names: HashSet<_> = first.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
		prop_assert_eq!(names.len(), first.len());

		for path in &first {
			prop_assert!(path.is_file());
		}
	}
}
