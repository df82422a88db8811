mod common;

use common::{MOCK_FILES, MOCK_FOLDERS, join_all};
use kodegen_bundler_msi::bundler::{
    FeatureSettings,
    msi::{
        Feature, File, build_tree, is_child, is_direct_child, plan_registry, populate,
        special_files,
    },
};
use proptest::prelude::*;
use std::path::{Path, PathBuf};

fn root() -> PathBuf {
    PathBuf::from("/tmp/slack")
}

#[test]
fn is_child_examples() {
    let parent = Path::new("/my/path");
    assert!(is_child(parent, Path::new("/my/path/child")));
    assert!(is_child(parent, Path::new("/my/path/child/indirect")));
    assert!(!is_child(parent, Path::new("/my/otherpath")));
    assert!(!is_child(parent, Path::new("/my/path")));
}

#[test]
fn is_direct_child_examples() {
    let parent = Path::new("/my/path");
    assert!(is_direct_child(parent, Path::new("/my/path/child")));
    assert!(!is_direct_child(parent, Path::new("/my/path/child/indirect")));
    assert!(!is_direct_child(parent, Path::new("/my/path")));
}

#[test]
fn builds_nested_tree_below_version_node() {
    let root = root();
    let tree = build_tree(&join_all(&root, MOCK_FOLDERS), &root, Some("1.0.0"));

    assert_eq!(tree.display_name, "slack");
    assert_eq!(tree.children.len(), 1);
    let version = tree.child("app-1.0.0").unwrap();
    assert_eq!(version.path, root);
    assert_eq!(version.display_name, "app-1.0.0");

    let unpacked = version
        .descend(["resources", "app.asar.unpacked"])
        .unwrap();
    assert_eq!(unpacked.path, root.join("resources/app.asar.unpacked"));
    assert_eq!(
        unpacked.children.keys().collect::<Vec<_>>(),
        ["node_modules", "src"]
    );
    assert!(version.child("locales").unwrap().children.is_empty());
}

#[test]
fn empty_directory_list_yields_root_and_version_node() {
    let root = root();
    let tree = build_tree(&[], &root, Some("2.0.0"));
    let version = tree.child("app-2.0.0").unwrap();
    assert!(version.children.is_empty());
    assert!(version.files.is_empty());
}

#[test]
fn directories_outside_root_are_ignored() {
    let root = root();
    let dirs = vec![PathBuf::from("/tmp/other"), root.join("locales")];
    let tree = build_tree(&dirs, &root, None);
    assert_eq!(tree.children.keys().collect::<Vec<_>>(), ["locales"]);
}

#[test]
fn populates_files_special_files_and_registry() {
    let root = root();
    let tree = build_tree(&join_all(&root, MOCK_FOLDERS), &root, Some("1.0.0"));
    let special = special_files(
        "slack",
        Path::new("/staging/slack.exe"),
        Path::new("/staging/.installInfo.json"),
        None,
    );
    let registry = plan_registry(&FeatureSettings::default(), false);

    let populated = populate(
        &tree,
        &join_all(&root, MOCK_FILES),
        special.clone(),
        registry.clone(),
        "1.0.0",
    )
    .unwrap();

    assert_eq!(populated.files, special);
    assert_eq!(populated.registry, registry);

    let version = populated.child("app-1.0.0").unwrap();
    assert_eq!(
        version.files,
        [File::named("slack.exe", root.join("slack.exe"), Feature::Main)]
    );
    assert!(version.registry.is_empty());
    let locales: Vec<_> = version
        .child("locales")
        .unwrap()
        .files
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(locales, ["de-DE.json", "en-US.json"]);
    assert_eq!(
        version
            .descend(["resources", "app.asar.unpacked", "src"])
            .unwrap()
            .files[0]
            .path,
        root.join("resources/app.asar.unpacked/src/package.json")
    );

    // input tree untouched
    assert_eq!(tree.file_count(), 0);
    assert_eq!(populated.file_count(), MOCK_FILES.len() + special.len());
}

#[test]
fn text_file_lands_in_resources() {
    let root = PathBuf::from("/root/app-1.0.0");
    let tree = build_tree(&[root.join("resources")], &root, Some("1.0.0"));
    let populated = populate(
        &tree,
        &[root.join("resources/text.txt")],
        vec![],
        vec![],
        "1.0.0",
    )
    .unwrap();

    let resources = populated.descend(["app-1.0.0", "resources"]).unwrap();
    assert_eq!(
        resources.files,
        [File {
            name: "text.txt".into(),
            path: root.join("resources/text.txt"),
            feature: Feature::Main,
        }]
    );
}

#[test]
fn files_without_directory_node_are_dropped() {
    let root = root();
    let tree = build_tree(&[root.join("locales")], &root, Some("1.0.0"));
    let populated = populate(
        &tree,
        &[
            root.join("locales/de-DE.json"),
            root.join("missing/file.txt"),
            PathBuf::from("/elsewhere/file.txt"),
        ],
        vec![],
        vec![],
        "1.0.0",
    )
    .unwrap();
    assert_eq!(populated.file_count(), 1);
}

#[test]
fn populate_requires_version_node() {
    let root = root();
    let tree = build_tree(&[], &root, None);
    let err = populate(&tree, &[], vec![], vec![], "1.0.0").unwrap_err();
    assert!(err.to_string().contains("app-1.0.0"));
}

fn relative_tree() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    // Directory paths built from small segment alphabets, plus files placed
    // in those directories or at the root.
    prop::collection::vec(prop::collection::vec("[a-d]{1,3}", 1..4), 0..12).prop_flat_map(
        |segments| {
            let mut dirs: Vec<String> = Vec::new();
            for path in &segments {
                for depth in 1..=path.len() {
                    let dir = path[..depth].join("/");
                    if !dirs.contains(&dir) {
                        dirs.push(dir);
                    }
                }
            }
            let mut parents = dirs.clone();
            parents.push(String::new());
            let files = prop::collection::vec(
                (prop::sample::select(parents), "[e-h]{1,4}\\.txt"),
                0..20,
            )
            .prop_map(|files| {
                let mut out: Vec<String> = Vec::new();
                for (parent, name) in files {
                    let path = if parent.is_empty() {
                        name
                    } else {
                        format!("{parent}/{name}")
                    };
                    if !out.contains(&path) {
                        out.push(path);
                    }
                }
                out
            });
            (Just(dirs), files)
        },
    )
}

proptest! {
    #[test]
    fn every_consistent_file_is_placed_exactly_once((dirs, files) in relative_tree()) {
        let root = root();
        let dirs: Vec<PathBuf> = dirs.iter().map(|d| root.join(d)).collect();
        let files: Vec<PathBuf> = files.iter().map(|f| root.join(f)).collect();

        let tree = build_tree(&dirs, &root, Some("1.0.0"));
        let populated = populate(&tree, &files, vec![], vec![], "1.0.0").unwrap();

        prop_assert_eq!(populated.file_count(), files.len());
        let mut placed: Vec<PathBuf> = populated.all_files().into_iter().map(|f| f.path.clone()).collect();
        let mut expected = files.clone();
        placed.sort();
        expected.sort();
        prop_assert_eq!(placed, expected);
    }

    #[test]
    fn direct_child_implies_child(a in "[a-c]{1,2}(/[a-c]{1,2}){0,3}", b in "[a-c]{1,2}(/[a-c]{1,2}){0,3}") {
        let parent = root().join(&a);
        let child = root().join(&b);
        if is_direct_child(&parent, &child) {
            prop_assert!(is_child(&parent, &child));
        }
        prop_assert!(!is_child(&parent, &parent));
        prop_assert!(!is_direct_child(&parent, &parent.join("x").join("y")));
    }
}
