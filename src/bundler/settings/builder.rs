//! Builder for constructing Settings.

use super::{Arch, PackageSettings, Settings, WindowsSettings};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Provides a fluent API for building bundler settings with validation.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::{Arch, PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_msi::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .app_directory("dist/acme-win32-x64")
///     .project_out_directory("dist/installer")
///     .package_settings(PackageSettings {
///         product_name: "Acme".into(),
///         version: "1.0.0".into(),
///         manufacturer: "Acme Technologies".into(),
///         exe: "acme".into(),
///         ..Default::default()
///     })
///     .arch(Arch::X86_64)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    app_directory: Option<PathBuf>,
    project_out_directory: Option<PathBuf>,
    package_settings: Option<PackageSettings>,
    windows_settings: WindowsSettings,
    arch: Option<Arch>,
    target: Option<String>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the application directory to package.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn app_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.app_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory for generated files.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_out_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_out_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets package metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets Windows signing and MSI configuration.
    ///
    /// Default: Empty [`WindowsSettings`]
    pub fn windows_settings(mut self, settings: WindowsSettings) -> Self {
        self.windows_settings = settings;
        self
    }

    /// Forces the package architecture.
    ///
    /// Default: detected from the target triple
    pub fn arch(mut self, arch: Arch) -> Self {
        self.arch = Some(arch);
        self
    }

    /// Sets target triple.
    ///
    /// If not set, uses the `TARGET` environment variable or current architecture.
    pub fn target(mut self, target: String) -> Self {
        self.target = Some(target);
        self
    }

    /// Builds the settings.
    ///
    /// Directories are made absolute and normalised so that path prefix
    /// comparisons during tree construction are reliable.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing:
    /// - `app_directory`
    /// - `project_out_directory`
    /// - `package_settings`
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::{Context, ErrorExt};

        let target = self.target.unwrap_or_else(|| {
            std::env::var("TARGET").unwrap_or_else(|_| std::env::consts::ARCH.to_string())
        });

        let app_directory = self.app_directory.context("app_directory is required")?;
        let app_directory = app_directory
            .absolutize()
            .fs_context("resolving application directory", &app_directory)?
            .into_owned();

        let project_out_directory = self
            .project_out_directory
            .context("project_out_directory is required")?;
        let project_out_directory = project_out_directory
            .absolutize()
            .fs_context("resolving output directory", &project_out_directory)?
            .into_owned();

        let package = self.package_settings.context("package_settings is required")?;
        if package.exe.is_empty() {
            crate::bail!("package exe name is required");
        }

        Ok(Settings::new(
            package,
            self.windows_settings,
            app_directory,
            project_out_directory,
            self.arch,
            target,
        ))
    }
}
