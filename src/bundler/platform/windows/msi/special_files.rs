//! Files injected into the install root that the application directory does
//! not contain: the stub launcher, the install-info marker and the updater.

use super::{Feature, tree::File};
use crate::{
    bail,
    bundler::{
        error::{Error, ErrorExt, Result},
        settings::Settings,
        utils::fs::copy_file,
    },
};
use chrono::Datelike;
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Name of the install-info marker in the install root.
pub const INSTALL_INFO_NAME: &str = ".installInfo.json";
/// Name of the updater in the install root.
pub const UPDATER_NAME: &str = "Update.exe";

/// Contents of `.installInfo.json`, read by the installed app to learn how it
/// was installed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallInfo {
    pub product_code: String,
    pub arch: String,
    pub install_version: String,
}

impl InstallInfo {
    pub fn new(product_code: Uuid, arch: &str, version: &str) -> Self {
        Self {
            product_code: format!("{{{}}}", product_code.hyphenated().to_string().to_uppercase()),
            arch: arch.to_string(),
            install_version: version.to_string(),
        }
    }
}

/// Writes `info` as `<staging>/.installInfo.json`.
pub async fn write_install_info(staging: &Path, info: &InstallInfo) -> Result<PathBuf> {
    let path = staging.join(INSTALL_INFO_NAME);
    let json = serde_json::to_vec_pretty(info)?;
    tokio::fs::write(&path, json)
        .await
        .fs_context("writing install info", &path)?;
    Ok(path)
}

/// Copies the stub launcher to `<staging>/<exe>.exe` and brands it with the
/// product's version resources when `rcedit` is available.
pub async fn stage_stub(settings: &Settings, staging: &Path, version: &str) -> Result<PathBuf> {
    let Some(stub) = settings.msi_settings().stub_executable.as_deref() else {
        bail!("no stub executable configured (windows.msi.stub_executable)");
    };
    let target = staging.join(format!("{}.exe", settings.exe_name()));
    copy_file(stub, &target).await?;

    match which::which("rcedit") {
        Ok(rcedit) => brand_stub(&rcedit, settings, &target, version).await?,
        Err(_) => log::warn!(
            "rcedit not found; {} keeps the stub's version resources",
            target.display()
        ),
    }

    Ok(target)
}

/// `rcedit` arguments that rewrite the stub's version resources.
pub fn rcedit_args(settings: &Settings, stub: &Path, version: &str, year: i32) -> Vec<String> {
    let mut args = vec![
        stub.display().to_string(),
        "--set-version-string".into(),
        "CompanyName".into(),
        settings.manufacturer().to_string(),
        "--set-version-string".into(),
        "FileDescription".into(),
        settings.description().to_string(),
        "--set-version-string".into(),
        "LegalCopyright".into(),
        format!("{year}@{}", settings.manufacturer()),
        "--set-version-string".into(),
        "ProductName".into(),
        settings.short_name().to_string(),
        "--set-file-version".into(),
        version.to_string(),
        "--set-product-version".into(),
        version.to_string(),
    ];
    if let Some(icon) = &settings.msi_settings().icon {
        args.push("--set-icon".into());
        args.push(icon.display().to_string());
    }
    args
}

async fn brand_stub(rcedit: &Path, settings: &Settings, stub: &Path, version: &str) -> Result<()> {
    let year = chrono::Local::now().year();
    let output = tokio::process::Command::new(rcedit)
        .args(rcedit_args(settings, stub, version, year))
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: "rcedit".to_string(),
            error,
        })?;

    if !output.status.success() {
        bail!(
            "rcedit failed on {}: {}",
            stub.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    log::debug!("Branded stub launcher {}", stub.display());
    Ok(())
}

/// The special files of a package, in install order.
///
/// The updater is only included (with `autoUpdate` affinity) when given.
pub fn special_files(
    exe_name: &str,
    stub: &Path,
    install_info: &Path,
    updater: Option<&Path>,
) -> Vec<File> {
    let mut files = vec![
        File::named(format!("{exe_name}.exe"), stub, Feature::Main),
        File::named(INSTALL_INFO_NAME, install_info, Feature::Main),
    ];
    if let Some(updater) = updater {
        files.push(File::named(UPDATER_NAME, updater, Feature::AutoUpdate));
    }
    files
}
