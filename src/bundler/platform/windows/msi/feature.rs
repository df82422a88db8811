//! Installable feature affinity.

use std::fmt;

/// The installer feature a component belongs to.
///
/// Each component is referenced from exactly one feature block of the
/// authored document, chosen by this tag.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Feature {
    /// The application itself; always installed.
    #[default]
    Main,
    /// Self-updater and the bookkeeping it needs write access to.
    AutoUpdate,
    /// Run-key registration that launches the app on login.
    AutoLaunch,
}

impl Feature {
    /// All features, in the order their reference blocks are emitted.
    pub const ALL: [Feature; 3] = [Feature::Main, Feature::AutoUpdate, Feature::AutoLaunch];
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Feature::Main => "main",
            Feature::AutoUpdate => "autoUpdate",
            Feature::AutoLaunch => "autoLaunch",
        })
    }
}
