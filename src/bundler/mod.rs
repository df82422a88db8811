//! MSI packaging for prebuilt Windows application directories.
//!
//! Takes an application directory (for example the output of an Electron
//! packager), authors a WiX source document describing every file, registry
//! value and optional feature, and compiles it into an `.msi` with the WiX
//! Toolset.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_msi::bundler::{Bundler, PackageSettings, SettingsBuilder};
//!
//! # async fn example() -> kodegen_bundler_msi::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .app_directory("dist/acme-win32-x64")
//!     .project_out_directory("dist/installer")
//!     .package_settings(PackageSettings {
//!         product_name: "Acme".into(),
//!         version: "1.0.0".into(),
//!         manufacturer: "Acme Technologies".into(),
//!         exe: "acme".into(),
//!         ..Default::default()
//!     })
//!     .build()?;
//!
//! let bundler = Bundler::new(settings).await?;
//! for artifact in bundler.bundle().await? {
//!     println!("{} ({} bytes, sha256 {})", artifact.paths[0].display(), artifact.size, artifact.checksum);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod platform;
pub mod settings;
pub mod utils;

pub use builder::Bundler;
pub use error::{Error, Result};
pub use platform::windows::msi;
pub use settings::{
    Arch, AutoLaunchSettings, FeatureSettings, InstallMode, MsiSettings, PackageSettings,
    Settings, SettingsBuilder, UiImages, UiOptions, UiSettings, WindowsSettings,
};

use std::path::PathBuf;

/// A file produced by the bundler.
#[derive(Clone, Debug)]
pub struct BundledArtifact {
    /// Produced files; the first one is the installer.
    pub paths: Vec<PathBuf>,
    /// Total size of `paths` in bytes.
    pub size: u64,
    /// Hex SHA-256 of the installer.
    pub checksum: String,
}
