//! Command line interface.
//!
//! Loads the manifest, builds [`Settings`] from it and the arguments, then
//! authors (and unless `--create-only`, compiles) the installer.
//!
//! [`Settings`]: crate::bundler::Settings

mod args;

pub use args::Args;

use crate::{
    bundler::{Bundler, SettingsBuilder, msi::SeededGuids},
    error::{BundlerError, CliError, Result},
    metadata::load_manifest,
};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(args).await
}

/// Runs the pipeline for already parsed arguments.
pub async fn execute(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| BundlerError::Cli(CliError::InvalidArguments { reason }))?;

    let mut manifest = load_manifest(&args.manifest)?;
    if !args.sign {
        manifest.windows.cert_path = None;
        manifest.windows.sign_command = None;
    }

    let mut builder = SettingsBuilder::new()
        .app_directory(&args.app_dir)
        .project_out_directory(&args.output_dir)
        .package_settings(manifest.package)
        .windows_settings(manifest.windows);
    let arch = args
        .target_arch()
        .map_err(|reason| BundlerError::Cli(CliError::InvalidArguments { reason }))?;
    if let Some(arch) = arch {
        builder = builder.arch(arch);
    }
    let settings = builder.build()?;

    let bundler = Bundler::new(settings).await?;
    let package = match &args.seed {
        Some(seed) => bundler.create_with(SeededGuids::from_seed(seed)).await?,
        None => bundler.create().await?,
    };
    println!("{}", package.wxs.path.display());

    if args.create_only {
        return Ok(0);
    }

    let artifact = bundler.compile(&package).await?;
    for path in &artifact.paths {
        println!("{}", path.display());
    }
    log::info!(
        "{} bytes, sha256 {}",
        artifact.size,
        artifact.checksum
    );
    Ok(0)
}
