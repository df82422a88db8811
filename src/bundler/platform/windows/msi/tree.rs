//! Installation tree construction.
//!
//! Turns the flat directory and file lists of an application directory into
//! a nested tree rooted at the install root:
//!
//! ```text
//! app                      <- install root (stub launcher, install info, registry)
//! └── app-1.0.0            <- version node, same path as the root
//!     ├── resources
//!     │   └── app.asar.unpacked
//!     └── locales
//! ```
//!
//! Paths outside the root are ignored, which keeps the builder permissive
//! towards whatever the directory walk produced.

use super::{Feature, registry::Registry};
use crate::bundler::error::{Error, Result};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// A payload file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct File {
    /// Installed file name.
    pub name: String,
    /// Source path on the build machine.
    pub path: PathBuf,
    /// Feature the file's component belongs to.
    pub feature: Feature,
}

impl File {
    /// A `main` file installed under its own name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path,
            feature: Feature::Main,
        }
    }

    /// A file installed as `name` regardless of its source file name.
    pub fn named(name: impl Into<String>, path: impl Into<PathBuf>, feature: Feature) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            feature,
        }
    }
}

/// One directory of the installation tree.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TreeNode {
    /// Source path this node represents.
    pub path: PathBuf,
    /// Directory name used when authoring, which may differ from the path's
    /// basename (the version node).
    pub display_name: String,
    /// Subdirectories keyed by directory name.
    pub children: BTreeMap<String, TreeNode>,
    /// Files installed directly into this directory.
    pub files: Vec<File>,
    /// Registry values; only populated on the install root.
    pub registry: Vec<Registry>,
}

impl TreeNode {
    fn new(path: &Path, display_name: String) -> Self {
        Self {
            path: path.to_path_buf(),
            display_name,
            ..Default::default()
        }
    }

    /// Child node by directory name.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.get(name)
    }

    /// Number of files in this node and all descendants.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.children.values().map(TreeNode::file_count).sum::<usize>()
    }

    /// All files in this node and all descendants, depth first.
    pub fn all_files(&self) -> Vec<&File> {
        let mut files: Vec<&File> = self.files.iter().collect();
        for child in self.children.values() {
            files.extend(child.all_files());
        }
        files
    }

    /// Follows `segments` from this node.
    pub fn descend<'a, I>(&self, segments: I) -> Option<&TreeNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        segments
            .into_iter()
            .try_fold(self, |node, segment| node.children.get(segment))
    }
}

/// Name of the synthetic payload folder for `version`.
pub fn version_dir_name(version: &str) -> String {
    format!("app-{version}")
}

/// Is `possible_child` somewhere below `parent`?
///
/// ```text
/// /my/path   /my/path/child            -> true
/// /my/path   /my/path/child/indirect   -> true
/// /my/path   /my/otherpath             -> false
/// /my/path   /my/path                  -> false
/// ```
pub fn is_child(parent: &Path, possible_child: &Path) -> bool {
    possible_child != parent && possible_child.starts_with(parent)
}

/// Is `possible_child` exactly one level below `parent`?
pub fn is_direct_child(parent: &Path, possible_child: &Path) -> bool {
    is_child(parent, possible_child)
        && possible_child.components().count() == parent.components().count() + 1
}

/// Builds the directory tree below `root` from a flat directory list.
///
/// With a `version`, every real directory is nested under a synthetic
/// `app-<version>` node whose path equals `root`.
pub fn build_tree(directories: &[PathBuf], root: &Path, version: Option<&str>) -> TreeNode {
    let mut output = TreeNode::new(root, basename(root));
    let children = subtree_children(directories, root);

    match version {
        Some(version) => {
            let name = version_dir_name(version);
            let mut version_node = TreeNode::new(root, name.clone());
            version_node.children = children;
            output.children.insert(name, version_node);
        }
        None => output.children = children,
    }

    output
}

fn subtree_children(directories: &[PathBuf], root: &Path) -> BTreeMap<String, TreeNode> {
    let descendants: Vec<PathBuf> = directories
        .iter()
        .filter(|dir| is_child(root, dir))
        .cloned()
        .collect();

    descendants
        .iter()
        .filter(|dir| is_direct_child(root, dir))
        .map(|dir| {
            let mut node = TreeNode::new(dir, basename(dir));
            node.children = subtree_children(&descendants, dir);
            (basename(dir), node)
        })
        .collect()
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Places files, special files and registry values into a built tree.
///
/// Returns a new tree; `tree` is left untouched.
///
/// - `special_files` become the install root's files (stable launcher folder).
/// - `registry` becomes the install root's registry list.
/// - Every real file lands in the node matching its directory below the
///   version node. A file whose directory has no node, or that lies outside
///   the root, is not placed and is reported with a warning.
///
/// # Errors
///
/// [`Error::MalformedTree`] when the tree has no `app-<version>` node.
pub fn populate(
    tree: &TreeNode,
    files: &[PathBuf],
    special_files: Vec<File>,
    registry: Vec<Registry>,
    version: &str,
) -> Result<TreeNode> {
    let mut output = tree.clone();
    output.files = special_files;
    output.registry = registry;

    let root = output.path.clone();
    let version_name = version_dir_name(version);
    let version_node = output.children.get_mut(&version_name).ok_or_else(|| {
        Error::MalformedTree(format!(
            "no `{version_name}` node below {}",
            root.display()
        ))
    })?;

    let mut dropped = 0usize;
    for path in files {
        if place_file(version_node, &root, path) {
            continue;
        }
        dropped += 1;
        log::warn!(
            "{} has no matching directory in the installation tree and will not be installed",
            path.display()
        );
    }

    if dropped > 0 {
        log::warn!("{dropped} of {} files were not placed", files.len());
    }
    log::debug!(
        "Populated installation tree with {} files and {} registry values",
        files.len() - dropped,
        output.registry.len()
    );

    Ok(output)
}

fn place_file(version_node: &mut TreeNode, root: &Path, path: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let Some((_, directories)) = segments.split_last() else {
        return false;
    };

    let mut target = version_node;
    for segment in directories {
        match target.children.get_mut(segment) {
            Some(child) => target = child,
            None => return false,
        }
    }
    target.files.push(File::from_path(path));
    true
}
