//! candle/light execution.
//!
//! Compiles the `.wxs` into a `.wixobj` with candle, then links it into the
//! `.msi` with light. Both run in the directory of their input so the outputs
//! land next to it under the same stem.

use super::toolset::WixToolset;
use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
};
use std::path::{Path, PathBuf};

const UI_EXTENSION: &str = "WixUIExtension";
const UTIL_EXTENSION: &str = "WixUtilExtension";

/// Build stage; also the extension of the stage's output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Wixobj,
    Msi,
}

impl Stage {
    fn extension(self) -> &'static str {
        match self {
            Stage::Wixobj => "wixobj",
            Stage::Msi => "msi",
        }
    }
}

/// Arguments shared by both stages.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompileOptions {
    pub extensions: Vec<String>,
    pub localizations: Vec<String>,
    pub cultures: Option<String>,
    pub light_switches: Vec<String>,
}

impl CompileOptions {
    /// Options from the MSI settings. `WixUtilExtension` is always present,
    /// `WixUIExtension` whenever a UI is shown.
    pub fn from_settings(settings: &Settings) -> Self {
        let msi = settings.msi_settings();
        let mut extensions = msi.extensions.clone();
        if msi.ui.enabled() && !extensions.iter().any(|e| e == UI_EXTENSION) {
            extensions.push(UI_EXTENSION.to_string());
        }
        if !extensions.iter().any(|e| e == UTIL_EXTENSION) {
            extensions.push(UTIL_EXTENSION.to_string());
        }

        Self {
            extensions,
            localizations: msi
                .ui
                .options()
                .map(|o| o.localizations.clone())
                .unwrap_or_default(),
            cultures: msi.cultures.clone(),
            light_switches: msi.light_switches.clone(),
        }
    }

    /// Arguments for `stage`, ending with `input`.
    pub fn args(&self, stage: Stage, input: &Path) -> Vec<String> {
        let mut args = Vec::new();
        if stage == Stage::Msi {
            args.extend(self.light_switches.iter().cloned());
            if let Some(cultures) = &self.cultures {
                args.push(format!("-cultures:{cultures}"));
            }
        }
        for extension in &self.extensions {
            args.push("-ext".into());
            args.push(extension.clone());
        }
        if stage == Stage::Msi {
            for localization in &self.localizations {
                args.push("-loc".into());
                args.push(localization.clone());
            }
        }
        args.push(input.display().to_string());
        args
    }
}

/// Output path of `stage` for `input`.
pub fn expected_output(input: &Path, stage: Stage) -> PathBuf {
    input.with_extension(stage.extension())
}

async fn run_stage(binary: &Path, options: &CompileOptions, stage: Stage, input: &Path) -> Result<PathBuf> {
    let cwd = input.parent().unwrap_or_else(|| Path::new("."));
    let expected = expected_output(input, stage);
    let command = binary
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| binary.display().to_string());

    log::info!("Running {command} for {}", input.display());
    let output = tokio::process::Command::new(binary)
        .args(options.args(stage, input))
        .current_dir(cwd)
        .output()
        .await
        .map_err(|error| Error::CommandFailed { command, error })?;

    if output.status.success() && expected.is_file() {
        return Ok(expected);
    }

    Err(Error::CompileFailed {
        stage: stage.extension().to_string(),
        code: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

/// Compiles `wxs` with candle, returning the `.wixobj`.
pub async fn run_candle(toolset: &WixToolset, options: &CompileOptions, wxs: &Path) -> Result<PathBuf> {
    run_stage(&toolset.candle, options, Stage::Wixobj, wxs).await
}

/// Links `wixobj` with light, returning the `.msi`.
pub async fn run_light(toolset: &WixToolset, options: &CompileOptions, wixobj: &Path) -> Result<PathBuf> {
    run_stage(&toolset.light, options, Stage::Msi, wixobj).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> CompileOptions {
        CompileOptions {
            extensions: vec![UTIL_EXTENSION.into()],
            localizations: vec!["de-de.wxl".into()],
            cultures: Some("de-DE".into()),
            light_switches: vec!["-sval".into()],
        }
    }

    #[test]
    fn candle_gets_extensions_only() {
        let args = options().args(Stage::Wixobj, Path::new("out/app.wxs"));
        assert_eq!(args, ["-ext", "WixUtilExtension", "out/app.wxs"]);
    }

    #[test]
    fn light_gets_switches_cultures_and_localizations() {
        let args = options().args(Stage::Msi, Path::new("out/app.wixobj"));
        assert_eq!(
            args,
            [
                "-sval",
                "-cultures:de-DE",
                "-ext",
                "WixUtilExtension",
                "-loc",
                "de-de.wxl",
                "out/app.wixobj"
            ]
        );
    }

    #[test]
    fn outputs_share_the_stem() {
        assert_eq!(
            expected_output(Path::new("out/app.wxs"), Stage::Wixobj),
            PathBuf::from("out/app.wixobj")
        );
        assert_eq!(
            expected_output(Path::new("out/app.wixobj"), Stage::Msi),
            PathBuf::from("out/app.msi")
        );
    }
}
