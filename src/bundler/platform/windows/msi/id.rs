//! Identifier generation for WiX elements.
//!
//! WiX identifiers must start with a letter or underscore, may only contain
//! ASCII letters, digits, underscores and periods, and are limited in length.
//! Ids derived here combine a readable path fragment with a GUID suffix, so
//! uniqueness never depends on the path text.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Longest relative path kept verbatim in an id before falling back to the
/// file name.
pub const MAX_ID_PATH_LEN: usize = 34;

/// Supplies GUIDs for id suffixes and component `Guid` attributes.
pub trait GuidSource: Send {
    /// Returns the next GUID.
    fn next_guid(&mut self) -> Uuid;
}

/// Random (v4) GUIDs. Used for real packages.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomGuids;

impl GuidSource for RandomGuids {
    fn next_guid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic (v5) GUIDs derived from a namespace and a counter.
///
/// Two sources with the same namespace produce the same sequence, which
/// makes authored documents reproducible.
#[derive(Debug, Clone)]
pub struct SeededGuids {
    namespace: Uuid,
    counter: u64,
}

impl SeededGuids {
    /// Creates a source seeded by `namespace`.
    pub fn new(namespace: Uuid) -> Self {
        Self {
            namespace,
            counter: 0,
        }
    }

    /// Creates a source whose namespace is derived from a string seed.
    pub fn from_seed(seed: &str) -> Self {
        Self::new(Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()))
    }
}

impl GuidSource for SeededGuids {
    fn next_guid(&mut self) -> Uuid {
        self.counter += 1;
        Uuid::new_v5(&self.namespace, &self.counter.to_be_bytes())
    }
}

/// Builds a WiX-safe id for `path` relative to `root`, using `suffix` for
/// uniqueness.
///
/// The path relative to `root` is kept when it is at most
/// [`MAX_ID_PATH_LEN`] characters; otherwise only the first
/// [`MAX_ID_PATH_LEN`] characters of the file name are used. Paths outside
/// `root` are treated as if relative to the filesystem root.
pub fn make_id(path: &Path, root: &Path, suffix: Uuid) -> String {
    let relative = match path.strip_prefix(root) {
        Ok(relative) => relative.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    };
    let relative = relative.trim_start_matches(['\\', '/']);

    let part: String = if relative.chars().count() > MAX_ID_PATH_LEN {
        path.file_name()
            .map(|name| name.to_string_lossy().chars().take(MAX_ID_PATH_LEN).collect())
            .unwrap_or_default()
    } else {
        relative.to_string()
    };

    format!("_{}_{}", part, suffix.hyphenated())
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Id factory bound to an application root and a GUID source.
pub struct IdGenerator {
    root: PathBuf,
    guids: Box<dyn GuidSource>,
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl IdGenerator {
    /// Creates a generator for paths under `root`.
    pub fn new(root: impl Into<PathBuf>, guids: impl GuidSource + 'static) -> Self {
        Self {
            root: root.into(),
            guids: Box::new(guids),
        }
    }

    /// Returns a fresh id for `path`.
    pub fn make_id(&mut self, path: &Path) -> String {
        let suffix = self.guids.next_guid();
        make_id(path, &self.root, suffix)
    }

    /// Returns a fresh GUID.
    pub fn guid(&mut self) -> Uuid {
        self.guids.next_guid()
    }

    /// Root that ids are made relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl GuidSource for IdGenerator {
    fn next_guid(&mut self) -> Uuid {
        self.guids.next_guid()
    }
}
