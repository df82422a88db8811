//! MSI manifest loading.
//!
//! The manifest is a TOML file with a `[package]` table and optional
//! `[windows]` / `[windows.msi]` tables:
//!
//! ```toml
//! [package]
//! product_name = "Acme"
//! version = "1.0.0"
//! description = "ACME is the best company ever"
//! manufacturer = "Acme Technologies"
//! exe = "acme"
//!
//! [windows.msi]
//! stub_executable = "vendor/StubExecutable.exe"
//! upgrade_code = "2BD6C9C3-1F0D-4E2A-9F55-7D7C3E7B1A10"
//! ```

use crate::bundler::{PackageSettings, WindowsSettings};
use crate::error::{BundlerError, CliError, Result};
use std::path::Path;

/// Parsed manifest.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct MsiManifest {
    /// `[package]` section
    pub package: PackageSettings,

    /// `[windows]` section, including `[windows.msi]`
    #[serde(default)]
    pub windows: WindowsSettings,
}

/// Parses manifest text.
pub fn parse_manifest(manifest: &str) -> Result<MsiManifest> {
    toml::from_str(manifest).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "parse_manifest".to_string(),
            reason: format!("Failed to parse manifest: {}", e),
        })
    })
}

/// Reads and parses the manifest at `path`.
///
/// Relative paths inside `[windows.msi]` (stub, updater, icon, UI template)
/// are resolved against the manifest's directory.
pub fn load_manifest(path: &Path) -> Result<MsiManifest> {
    let manifest = std::fs::read_to_string(path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_manifest".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    let mut manifest = parse_manifest(&manifest)?;
    if manifest.package.product_name.is_empty() {
        return Err(BundlerError::Cli(CliError::InvalidArguments {
            reason: "[package] product_name must not be empty".to_string(),
        }));
    }

    if let Some(base) = path.parent() {
        let msi = &mut manifest.windows.msi;
        for file in [
            &mut msi.stub_executable,
            &mut msi.updater_executable,
            &mut msi.icon,
        ]
        .into_iter()
        .flatten()
        {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
        if let Some(template) = msi.ui.options_mut().and_then(|o| o.template.as_mut())
            && template.is_relative()
        {
            *template = base.join(&*template);
        }
    }

    Ok(manifest)
}
