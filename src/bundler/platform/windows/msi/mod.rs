//! Windows MSI installer authoring with the WiX Toolset v3.
//!
//! An application directory is turned into a WiX source document, then
//! compiled with `candle` and linked with `light`:
//!
//! 1. Walk the application directory into flat file and directory lists
//! 2. Stage the special files (stub launcher, install info, updater)
//! 3. Plan registry values for the enabled features
//! 4. Build the installation tree and populate it
//! 5. Compile the tree into directory/component fragments and references
//! 6. Assemble and write `<exe>.wxs`
//! 7. Sign the staged executables if configured, run candle and light, then
//!    sign the `.msi`
//!
//! # Module Organization
//!
//! - `id` - WiX-safe identifiers and GUID sources
//! - `tree` - installation tree building and population
//! - `registry` - registry values per feature
//! - `fragment` - directory/component fragment compilation
//! - `template` - WiX templates
//! - `document` - master document assembly
//! - `special_files` - stub launcher, install info and updater staging
//! - `toolset` - candle/light lookup
//! - `build` - candle/light execution
//! - `utils` - architecture mapping, versions, XML escaping

mod build;
mod document;
mod feature;
mod fragment;
mod id;
mod registry;
mod special_files;
mod template;
mod toolset;
mod tree;
mod utils;

pub use build::{CompileOptions, Stage, expected_output, run_candle, run_light};
pub use document::{
    DocumentInputs, REMOVE_NEWLINE, WxsDocument, remove_marked_lines, render_shortcut_properties,
    render_ui, render_wxs, replace_in_string, write_wxs,
};
pub use feature::Feature;
pub use fragment::{
    CompiledTree, Component, ComponentRef, DirectoryFragment, FeatureReferences,
    FragmentCompiler, INDENT_STEP, PARENT_DIR_NAME, ROOT_INDENT, components_by_feature,
};
pub use id::{GuidSource, IdGenerator, MAX_ID_PATH_LEN, RandomGuids, SeededGuids, make_id};
pub use registry::{
    PRODUCT_REG_KEY, Permission, RUN_KEY, Registry, RegistryRoot, RegistryValueType,
    UNINSTALL_KEY, find_duplicate_ids, plan_registry, run_key_value,
};
pub use special_files::{
    INSTALL_INFO_NAME, InstallInfo, UPDATER_NAME, rcedit_args, special_files, stage_stub,
    write_install_info,
};
pub use template::Templates;
pub use toolset::{WixToolset, find_version, get_wix_toolset, locate};
pub use tree::{
    File, TreeNode, build_tree, is_child, is_direct_child, populate, version_dir_name,
};
pub use utils::{
    braced_clsid, escape_xml, map_arch, program_files_folder, win64_yes_no,
    windows_compliant_version,
};

use super::sign;
use crate::{
    bail,
    bundler::{
        error::{Error, ErrorExt, Result},
        settings::Settings,
        utils::fs::{copy_file, create_dir_all, get_directory_structure},
    },
};
use std::path::PathBuf;
use uuid::Uuid;

/// Directory id of the install root.
pub const ROOTDIR_NAME: &str = "APPLICATIONROOTDIRECTORY";

/// Result of authoring a package.
#[derive(Clone, Debug)]
pub struct AuthoredPackage {
    pub wxs: WxsDocument,
    pub product_code: Uuid,
    /// Number of components in the document.
    pub components: usize,
    /// Staged executables installed next to the payload (stub launcher and
    /// updater). Signed before linking when signing is configured.
    pub support_binaries: Vec<PathBuf>,
}

/// Authors `<output>/<exe>.wxs` for the application directory.
///
/// `guids` supplies every id suffix and GUID, including the product code.
pub async fn create_wxs(
    settings: &Settings,
    guids: impl GuidSource + 'static,
) -> Result<AuthoredPackage> {
    let app_dir = settings.app_directory();
    let out_dir = settings.project_out_directory();
    let version = settings.version_string();
    let arch = settings.binary_arch();
    let msi = settings.msi_settings();

    log::info!(
        "Authoring MSI for {} {} ({})",
        settings.product_name(),
        version,
        map_arch(arch)
    );
    windows_compliant_version(version)?;
    if out_dir == app_dir {
        bail!(
            "output directory {} must differ from the application directory",
            out_dir.display()
        );
    }

    let mut ids = IdGenerator::new(app_dir, guids);
    let product_code = ids.guid();

    // Special files
    let staging = out_dir.join("staging");
    create_dir_all(&staging, true).await?;
    let stub = stage_stub(settings, &staging, &windows_compliant_version(version)?).await?;
    let install_info = write_install_info(
        &staging,
        &InstallInfo::new(product_code, map_arch(arch), version),
    )
    .await?;
    let updater = if msi.features.auto_update {
        match &msi.updater_executable {
            Some(updater) => {
                let staged = staging.join(UPDATER_NAME);
                copy_file(updater, &staged).await?;
                Some(staged)
            }
            None => bail!("auto_update requires windows.msi.updater_executable"),
        }
    } else {
        None
    };
    let special = special_files(settings.exe_name(), &stub, &install_info, updater.as_deref());
    let support_binaries: Vec<PathBuf> = special
        .iter()
        .filter(|file| file.name.ends_with(".exe"))
        .map(|file| file.path.clone())
        .collect();

    // Registry
    let registry = plan_registry(&msi.features, msi.bundled);
    if let Some(duplicate) = find_duplicate_ids(&registry).first() {
        return Err(Error::DuplicateRegistryId(duplicate.to_string()));
    }

    // Tree
    let mut structure = get_directory_structure(app_dir).await?;
    if is_child(app_dir, out_dir) {
        // earlier outputs and the staging folder are not payload
        structure = structure.without(out_dir);
    }
    let tree = build_tree(&structure.directories, app_dir, Some(version));
    let tree = populate(&tree, &structure.files, special, registry, version)?;

    // Fragments
    let templates = Templates::new()?;
    let mut compiler = FragmentCompiler::new(&templates, ids, win64_yes_no(arch))
        .nested_folder_name(msi.nested_folder_name.clone());
    let compiled = compiler.compile_root(&tree, settings.program_files_folder_name())?;
    let references = compiled.references(&templates)?;
    compiled.verify(&references)?;
    let mut ids = compiler.into_ids();

    // Document
    let ui_template = match msi.ui.options().and_then(|o| o.template.as_deref()) {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .fs_context("reading UI template", path)?,
        ),
        None => None,
    };
    let inputs = DocumentInputs {
        directories: &compiled.directories,
        references: &references,
        product_code,
        ui_template: ui_template.as_deref(),
    };
    let wxs = write_wxs(settings, &inputs, &templates, &mut ids, out_dir).await?;

    Ok(AuthoredPackage {
        wxs,
        product_code,
        components: compiled.components.len(),
        support_binaries,
    })
}

/// Compiles and links an authored package into an `.msi`.
///
/// When signing is configured the support binaries are signed before
/// linking embeds them, and the `.msi` afterwards.
pub async fn compile(settings: &Settings, package: &AuthoredPackage) -> Result<PathBuf> {
    let toolset = get_wix_toolset().await?;
    let options = CompileOptions::from_settings(settings);
    let signing = sign::should_sign(settings);
    if signing {
        sign::check_host_support(settings.windows_settings(), sign::SignTool::host())?;
        for binary in &package.support_binaries {
            sign::sign_file(binary, settings).await?;
        }
    }

    let wixobj = run_candle(&toolset, &options, &package.wxs.path).await?;
    let msi = run_light(&toolset, &options, &wixobj).await?;

    if signing {
        sign::sign_file(&msi, settings).await?;
    } else {
        log::debug!("Signing not configured, leaving {} unsigned", msi.display());
    }

    log::info!("Created MSI installer: {}", msi.display());
    Ok(msi)
}

/// Bundle project as MSI installer.
///
/// # Returns
///
/// Vector containing the path to the generated `.msi`
pub async fn bundle_project(settings: &Settings) -> Result<Vec<PathBuf>> {
    let package = create_wxs(settings, RandomGuids).await?;
    let msi = compile(settings, &package).await?;
    Ok(vec![msi])
}
