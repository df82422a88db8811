//! Core Settings struct and implementations.

use super::{Arch, MsiSettings, PackageSettings, WindowsSettings};
use std::path::{Path, PathBuf};

/// Main settings for bundler operations.
///
/// Central configuration for the bundler, constructed via [`SettingsBuilder`].
/// Contains package metadata, the application directory to package and the
/// Windows-specific configuration.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_msi::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .app_directory("dist/acme-win32-x64")
///     .project_out_directory("dist/installer")
///     .package_settings(PackageSettings {
///         product_name: "Acme".into(),
///         version: "1.0.0".into(),
///         description: "ACME is the best company ever".into(),
///         manufacturer: "Acme Technologies".into(),
///         exe: "acme".into(),
///         ..Default::default()
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`SettingsBuilder`] - Builder for constructing Settings
/// - [`PackageSettings`] - Package metadata
/// - [`WindowsSettings`] - Signing and MSI configuration
///
/// [`SettingsBuilder`]: super::SettingsBuilder
#[derive(Clone, Debug)]
pub struct Settings {
    /// Package metadata.
    package: PackageSettings,

    /// Windows signing and MSI configuration.
    windows: WindowsSettings,

    /// Application directory whose contents are installed.
    app_directory: PathBuf,

    /// Output directory for the .wxs, .wixobj and .msi files.
    project_out_directory: PathBuf,

    /// Explicit architecture, overriding target detection.
    arch: Option<Arch>,

    /// Target triple (e.g., "x86_64-pc-windows-msvc").
    ///
    /// Used for architecture detection.
    target: String,
}

impl Settings {
    /// Returns the product name.
    pub fn product_name(&self) -> &str {
        &self.package.product_name
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the package description.
    pub fn description(&self) -> &str {
        &self.package.description
    }

    /// Returns the manufacturer.
    pub fn manufacturer(&self) -> &str {
        &self.package.manufacturer
    }

    /// Returns the executable name without the `.exe` extension.
    pub fn exe_name(&self) -> &str {
        self.package
            .exe
            .strip_suffix(".exe")
            .unwrap_or(&self.package.exe)
    }

    /// Returns the short name, falling back to the product name.
    pub fn short_name(&self) -> &str {
        self.package
            .short_name
            .as_deref()
            .unwrap_or(&self.package.product_name)
    }

    /// Returns the application directory being packaged.
    pub fn app_directory(&self) -> &Path {
        &self.app_directory
    }

    /// Returns the project output directory.
    pub fn project_out_directory(&self) -> &Path {
        &self.project_out_directory
    }

    /// Returns the architecture of the packaged application.
    ///
    /// An explicit architecture wins; otherwise it is detected from the
    /// target triple (e.g., "x86_64-pc-windows-msvc" → `Arch::X86_64`).
    pub fn binary_arch(&self) -> Arch {
        if let Some(arch) = self.arch {
            return arch;
        }
        if self.target.starts_with("x86_64") {
            Arch::X86_64
        } else if self.target.starts_with('i') {
            Arch::X86
        } else if self.target.starts_with("aarch64") {
            Arch::AArch64
        } else if self.target.starts_with("ia64") {
            Arch::Ia64
        } else {
            Arch::X86_64 // fallback
        }
    }

    /// Returns the Windows settings.
    pub fn windows_settings(&self) -> &WindowsSettings {
        &self.windows
    }

    /// Returns the MSI settings.
    pub fn msi_settings(&self) -> &MsiSettings {
        &self.windows.msi
    }

    /// Folder created under Program Files.
    pub fn program_files_folder_name(&self) -> &str {
        self.windows
            .msi
            .program_files_folder_name
            .as_deref()
            .unwrap_or(&self.package.product_name)
    }

    /// Start menu folder.
    pub fn shortcut_folder_name(&self) -> &str {
        self.windows
            .msi
            .shortcut_folder_name
            .as_deref()
            .unwrap_or(&self.package.manufacturer)
    }

    /// Start menu shortcut name.
    pub fn shortcut_name(&self) -> &str {
        self.windows
            .msi
            .shortcut_name
            .as_deref()
            .unwrap_or(&self.package.product_name)
    }

    /// AppUserModelID applied to shortcuts and the run key.
    pub fn app_user_model_id(&self) -> String {
        match &self.windows.msi.app_user_model_id {
            Some(id) => id.clone(),
            None => format!("com.squirrel.{}.{}", self.short_name(), self.exe_name()).to_lowercase(),
        }
    }

    /// Product language id.
    pub fn language(&self) -> u32 {
        self.windows.msi.language.unwrap_or(1033)
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        package: PackageSettings,
        windows: WindowsSettings,
        app_directory: PathBuf,
        project_out_directory: PathBuf,
        arch: Option<Arch>,
        target: String,
    ) -> Self {
        Self {
            package,
            windows,
            app_directory,
            project_out_directory,
            arch,
            target,
        }
    }
}
