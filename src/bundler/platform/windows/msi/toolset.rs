//! WiX toolset location.
//!
//! Looks for `candle` and `light` on PATH first, then under `$WIX/bin`
//! where the WiX installer puts them.

use crate::bundler::error::{Error, Result};
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

static VERSION_RE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r" version (\d\.\d{1,2}\.\d{1,2}\.\d{1,6})"));

/// Located WiX binaries.
#[derive(Clone, Debug)]
pub struct WixToolset {
    pub candle: PathBuf,
    pub light: PathBuf,
    pub candle_version: Option<String>,
    pub light_version: Option<String>,
}

/// Extracts the toolset version from a WiX banner, e.g.
/// `Windows Installer XML Toolset Compiler version 3.11.2.4516`.
pub fn find_version(banner: &str) -> Option<String> {
    let re = VERSION_RE.as_ref().ok()?;
    re.captures(banner)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Finds `name` on PATH or in `$WIX/bin`.
pub fn locate(name: &str) -> Option<PathBuf> {
    if let Ok(path) = which::which(name) {
        return Some(path);
    }
    let wix = std::env::var_os("WIX")?;
    let candidate = Path::new(&wix).join("bin").join(format!("{name}.exe"));
    candidate.is_file().then_some(candidate)
}

async fn banner_version(binary: &Path) -> Option<String> {
    let output = tokio::process::Command::new(binary)
        .arg("-?")
        .output()
        .await
        .ok()?;
    find_version(&String::from_utf8_lossy(&output.stdout))
}

/// Locates the toolset and reads its version.
///
/// # Errors
///
/// [`Error::WixNotFound`] when either binary is missing.
pub async fn get_wix_toolset() -> Result<WixToolset> {
    let (Some(candle), Some(light)) = (locate("candle"), locate("light")) else {
        log::error!(
            "WiX not found. Install the WiX Toolset v3 and make sure candle and light are on \
             PATH or WIX points at the installation"
        );
        return Err(Error::WixNotFound);
    };

    let toolset = WixToolset {
        candle_version: banner_version(&candle).await,
        light_version: banner_version(&light).await,
        candle,
        light,
    };
    log::info!(
        "Using light ({}) and candle ({})",
        toolset.light_version.as_deref().unwrap_or("unknown version"),
        toolset.candle_version.as_deref().unwrap_or("unknown version"),
    );
    Ok(toolset)
}
