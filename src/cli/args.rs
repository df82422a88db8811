//! Command line argument parsing and validation.

use crate::bundler::Arch;
use clap::Parser;
use std::path::PathBuf;

/// MSI installer builder for prebuilt Windows application directories
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_msi",
    version,
    about = "Builds a WiX MSI installer from a Windows application directory",
    long_about = "Authors a WiX source document (.wxs) describing every file of an application \
directory, then compiles and links it into an .msi with candle and light.

Usage:
  kodegen_bundler_msi --app-dir dist/acme-win32-x64 --manifest msi.toml --output-dir dist/installer
  kodegen_bundler_msi --app-dir dist/acme-win32-x64 --manifest msi.toml --output-dir out --create-only

Exit code 0 = the .wxs (and, unless --create-only, the .msi) exists in the output directory."
)]
pub struct Args {
    /// Application directory to package
    #[arg(short = 'a', long, value_name = "DIR", env = "MSI_APP_DIR")]
    pub app_dir: PathBuf,

    /// MSI manifest (TOML with [package] and [windows.msi] tables)
    #[arg(short = 'm', long, value_name = "FILE", env = "MSI_MANIFEST")]
    pub manifest: PathBuf,

    /// Directory for the .wxs, .wixobj and .msi files
    #[arg(short = 'o', long, value_name = "DIR", env = "MSI_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Target architecture: x86, x64, ia64, arm64
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,

    /// Only author the .wxs document, do not run candle and light
    #[arg(long)]
    pub create_only: bool,

    /// Sign the .msi with the certificate configured in [windows]
    #[arg(long)]
    pub sign: bool,

    /// Seed for reproducible GUIDs
    #[arg(long, value_name = "SEED", hide = true)]
    pub seed: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.app_dir.is_dir() {
            return Err(format!(
                "Application directory does not exist: {}",
                self.app_dir.display()
            ));
        }
        if !self.manifest.is_file() {
            return Err(format!("Manifest not found: {}", self.manifest.display()));
        }
        if self.create_only && self.sign {
            return Err("--sign has no effect with --create-only".to_string());
        }
        self.target_arch()?;
        Ok(())
    }

    /// Parsed `--arch`.
    pub fn target_arch(&self) -> Result<Option<Arch>, String> {
        match &self.arch {
            None => Ok(None),
            Some(arch) => Arch::parse(arch).map(Some).ok_or_else(|| {
                format!("Invalid architecture: {arch}. Valid architectures: x86, x64, ia64, arm64")
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn rejects_unknown_arch() {
        let args = Args::parse_from([
            "kodegen_bundler_msi",
            "--app-dir",
            ".",
            "--manifest",
            "msi.toml",
            "--output-dir",
            "out",
            "--arch",
            "mips",
        ]);
        assert!(args.target_arch().is_err());
    }
}
