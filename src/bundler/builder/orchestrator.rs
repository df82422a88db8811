//! Main bundler orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that authors the WiX
//! document, compiles it and collects artifact metadata.

use crate::{
    bail,
    bundler::{
        BundledArtifact, Result, Settings,
        error::{Error, ErrorExt},
        msi::{self, AuthoredPackage, GuidSource, RandomGuids},
    },
};

use super::{checksum::calculate_sha256, tool_detection::HAS_WIX};
use std::path::Path;

/// Main bundler orchestrator.
///
/// Authoring (`create`) works on any host; compiling (`compile`) needs the
/// WiX Toolset v3 and is usually run on Windows.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::{Bundler, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_msi::bundler::Result<()> {
/// let bundler = Bundler::new(settings).await?;
///
/// // Author only
/// let package = bundler.create().await?;
/// println!("{}", package.wxs.path.display());
///
/// // Or author, compile and sign
/// let artifacts = bundler.bundle().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    ///
    /// Fails early when the application directory or its main executable
    /// does not exist.
    pub async fn new(settings: Settings) -> Result<Self> {
        let app_dir = settings.app_directory();
        let metadata = tokio::fs::metadata(app_dir)
            .await
            .fs_context("reading application directory", app_dir)?;
        if !metadata.is_dir() {
            bail!("{} is not a directory", app_dir.display());
        }

        let exe = app_dir.join(format!("{}.exe", settings.exe_name()));
        if !exe.is_file() {
            log::warn!(
                "{} not found; shortcuts will point at a missing executable",
                exe.display()
            );
        }

        Ok(Self { settings })
    }

    /// Authors the `.wxs` document with random GUIDs.
    pub async fn create(&self) -> Result<AuthoredPackage> {
        self.create_with(RandomGuids).await
    }

    /// Authors the `.wxs` document drawing every GUID from `guids`.
    ///
    /// With a seeded source the output is reproducible.
    pub async fn create_with(&self, guids: impl GuidSource + 'static) -> Result<AuthoredPackage> {
        let package = msi::create_wxs(&self.settings, guids).await?;
        log::info!(
            "Authored {} components into {} (product code {})",
            package.components,
            package.wxs.path.display(),
            package.product_code
        );
        Ok(package)
    }

    /// Compiles an authored package into a signed (when configured) `.msi`.
    pub async fn compile(&self, package: &AuthoredPackage) -> Result<BundledArtifact> {
        if !*HAS_WIX {
            return Err(Error::WixNotFound);
        }
        let msi = msi::compile(&self.settings, package).await?;
        artifact(&msi).await
    }

    /// Authors, compiles and signs the installer.
    pub async fn bundle(&self) -> Result<Vec<BundledArtifact>> {
        let package = self.create().await?;
        let artifact = self.compile(&package).await?;
        Ok(vec![artifact])
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

async fn artifact(path: &Path) -> Result<BundledArtifact> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;
    let checksum = calculate_sha256(path).await?;

    Ok(BundledArtifact {
        paths: vec![path.to_path_buf()],
        size: metadata.len(),
        checksum,
    })
}
