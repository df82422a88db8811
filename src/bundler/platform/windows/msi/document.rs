//! WiX source document assembly.
//!
//! Two passes over [`WIX_TEMPLATE`]: scaffold slots (`<!-- {{Slot}} -->`)
//! receive the compiled fragments and the optional feature blocks, then
//! installer placeholders (`{{Name}}`) are substituted everywhere, including
//! inside the fragments. Lines ending in `{{remove newline}}` are dropped
//! together with their line break.

use super::{
    ROOTDIR_NAME,
    fragment::{ComponentRef, FeatureReferences},
    id::GuidSource,
    template::{
        self, AUTO_LAUNCH_FEATURE_TEMPLATE, AUTO_RUN_TEMPLATE, Templates, UI_TEMPLATE,
        UPDATER_FEATURE_TEMPLATE, UPDATER_PERMISSIONS_TEMPLATE, WIX_TEMPLATE,
    },
    utils::{
        braced_clsid, escape_xml, map_arch, program_files_folder, win64_yes_no,
        windows_compliant_version,
    },
};
use crate::bundler::{
    error::{ErrorExt, Result},
    settings::{InstallMode, Settings},
};
use regex::Regex;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use uuid::Uuid;

/// Marker that removes the line it ends and the preceding line break.
pub const REMOVE_NEWLINE: &str = "{{remove newline}}";

static REMOVE_NEWLINE_RE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\r?\n[^\n]*\{\{remove newline\}\}"));

/// Compiled inputs of the document.
#[derive(Debug)]
pub struct DocumentInputs<'a> {
    /// `<Directory>` fragment of the install root.
    pub directories: &'a str,
    pub references: &'a FeatureReferences,
    pub product_code: Uuid,
    /// Contents of a custom UI template, replacing [`UI_TEMPLATE`].
    pub ui_template: Option<&'a str>,
}

/// An authored `.wxs` file.
#[derive(Clone, Debug)]
pub struct WxsDocument {
    pub path: PathBuf,
    pub content: String,
}

/// Applies `replacements` in order, each to every occurrence.
pub fn replace_in_string(source: &str, replacements: &[(&str, String)]) -> String {
    replacements
        .iter()
        .fold(source.to_string(), |output, (from, to)| output.replace(from, to))
}

/// Drops every line carrying [`REMOVE_NEWLINE`].
pub fn remove_marked_lines(source: &str) -> String {
    match REMOVE_NEWLINE_RE.as_ref() {
        Ok(re) => re.replace_all(source, "").into_owned(),
        Err(e) => {
            log::warn!("remove-newline pattern failed to compile: {e}");
            source.to_string()
        }
    }
}

fn join_refs(refs: &[ComponentRef]) -> String {
    refs.iter()
        .map(|r| r.xml.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn or_remove(enabled: bool, block: &str) -> String {
    if enabled {
        block.to_string()
    } else {
        REMOVE_NEWLINE.to_string()
    }
}

/// Installer UI block, or the remove marker when the UI is off.
pub fn render_ui(
    settings: &Settings,
    templates: &Templates,
    custom_template: Option<&str>,
) -> Result<String> {
    let ui = &settings.msi_settings().ui;
    if !ui.enabled() {
        return Ok(REMOVE_NEWLINE.to_string());
    }

    let options = ui.options();
    let choose_directory = options.is_some_and(|o| o.choose_directory);

    let mut variables = Vec::new();
    if let Some(options) = options {
        for (id, value) in options.images.variables() {
            let mut data = BTreeMap::new();
            data.insert("id", id.to_string());
            data.insert("value", escape_xml(value));
            variables.push(templates.render(template::WIX_VARIABLE, &data)?);
        }
    }
    let variables = if variables.is_empty() {
        REMOVE_NEWLINE.to_string()
    } else {
        variables.join("\n")
    };

    let ui_ref = if choose_directory {
        "WixUI_InstallDir"
    } else {
        "WixUI_Minimal"
    };
    Ok(replace_in_string(
        custom_template.unwrap_or(UI_TEMPLATE),
        &[
            ("<!-- {{WixVariables}} -->", variables),
            ("{{UIRef}}", ui_ref.to_string()),
        ],
    ))
}

/// `<ShortcutProperty>` lines for the start menu shortcut.
pub fn render_shortcut_properties(settings: &Settings, templates: &Templates) -> Result<String> {
    let mut properties = vec![("System.AppUserModel.ID", settings.app_user_model_id())];
    if let Some(clsid) = &settings.msi_settings().toast_activator_clsid {
        properties.push((
            "System.AppUserModel.ToastActivatorCLSID",
            braced_clsid(clsid),
        ));
    }

    let mut lines = Vec::with_capacity(properties.len());
    for (key, value) in properties {
        let mut data = BTreeMap::new();
        data.insert("key", key.to_string());
        data.insert("value", escape_xml(&value));
        lines.push(templates.render(template::SHORTCUT_PROPERTY, &data)?);
    }
    Ok(lines.join("\n"))
}

/// Renders the complete `.wxs` document.
pub fn render_wxs(
    settings: &Settings,
    inputs: &DocumentInputs<'_>,
    templates: &Templates,
    guids: &mut dyn GuidSource,
) -> Result<String> {
    let msi = settings.msi_settings();
    let features = &msi.features;
    let arch = settings.binary_arch();
    let choose_directory = msi.ui.options().is_some_and(|o| o.choose_directory);

    let scaffold = [
        ("<!-- {{ComponentRefs}} -->", join_refs(&inputs.references.main)),
        ("<!-- {{Directories}} -->", inputs.directories.to_string()),
        ("<!-- {{UI}} -->", render_ui(settings, templates, inputs.ui_template)?),
        (
            "<!-- {{AutoUpdatePermissions}} -->",
            or_remove(features.auto_update, UPDATER_PERMISSIONS_TEMPLATE),
        ),
        (
            "<!-- {{AutoUpdateFeature}} -->",
            or_remove(features.auto_update, UPDATER_FEATURE_TEMPLATE),
        ),
        (
            "<!-- {{AutoLaunchFeature}} -->",
            or_remove(features.auto_launch.enabled(), AUTO_LAUNCH_FEATURE_TEMPLATE),
        ),
        (
            "<!-- {{UpdaterComponentRefs}} -->",
            join_refs(&inputs.references.auto_update),
        ),
        (
            "<!-- {{AutoLaunchComponentRefs}} -->",
            join_refs(&inputs.references.auto_launch),
        ),
        ("<!-- {{AutoRun}} -->", or_remove(msi.auto_run, AUTO_RUN_TEMPLATE)),
        (
            "<!-- {{ShortcutProperties}} -->",
            render_shortcut_properties(settings, templates)?,
        ),
    ];
    let scaffolded = replace_in_string(WIX_TEMPLATE, &scaffold);

    let upgrade_code = match &msi.upgrade_code {
        Some(code) => code.clone(),
        None => {
            log::warn!("No upgrade code configured; later versions will not upgrade this one");
            guids.next_guid().to_string()
        }
    };
    let install_mode = match msi.install_mode {
        InstallMode::PerUser => "perUser",
        InstallMode::PerMachine => "perMachine",
    };

    let placeholders = [
        ("{{ApplicationBinary}}", escape_xml(settings.exe_name())),
        ("{{ApplicationDescription}}", escape_xml(settings.description())),
        ("{{ApplicationName}}", escape_xml(settings.product_name())),
        ("{{ApplicationShortcutGuid}}", guids.next_guid().to_string()),
        ("{{ApplicationShortName}}", escape_xml(settings.short_name())),
        ("{{AppUserModelId}}", escape_xml(&settings.app_user_model_id())),
        ("{{Language}}", settings.language().to_string()),
        ("{{Manufacturer}}", escape_xml(settings.manufacturer())),
        ("{{ShortcutFolderName}}", escape_xml(settings.shortcut_folder_name())),
        ("{{ShortcutName}}", escape_xml(settings.shortcut_name())),
        ("{{UpgradeCode}}", upgrade_code),
        (
            "{{Version}}",
            windows_compliant_version(settings.version_string())?,
        ),
        ("{{SemanticVersion}}", settings.version_string().to_string()),
        ("{{Platform}}", map_arch(arch).to_string()),
        ("{{ProgramFilesFolder}}", program_files_folder(arch).to_string()),
        ("{{ProcessorArchitecture}}", map_arch(arch).to_string()),
        ("{{Win64YesNo}}", win64_yes_no(arch).to_string()),
        ("{{DesktopShortcutGuid}}", guids.next_guid().to_string()),
        ("{{UpdaterPermissionsGuid}}", guids.next_guid().to_string()),
        (
            "{{ConfigurableDirectory}}",
            if choose_directory {
                format!("ConfigurableDirectory=\"{ROOTDIR_NAME}\"")
            } else {
                String::new()
            },
        ),
        ("{{PackageScope}}", install_mode.to_string()),
        (
            "{{InstallPerUser}}",
            if msi.install_mode == InstallMode::PerUser { "1" } else { "0" }.to_string(),
        ),
        (
            "{{ProductCode}}",
            inputs.product_code.hyphenated().to_string().to_uppercase(),
        ),
        ("{{RandomGuid}}", guids.next_guid().to_string()),
        (
            "{{RebootMode}}",
            msi.reboot_mode.clone().unwrap_or_else(|| "ReallySuppress".into()),
        ),
        ("{{InstallLevel}}", msi.install_level.unwrap_or(2).to_string()),
        (
            "{{UpdaterUserGroup}}",
            escape_xml(msi.updater_user_group.as_deref().unwrap_or("Users")),
        ),
    ];

    Ok(remove_marked_lines(&replace_in_string(
        &scaffolded,
        &placeholders,
    )))
}

/// Renders the document and writes it to `<output_dir>/<exe>.wxs`.
pub async fn write_wxs(
    settings: &Settings,
    inputs: &DocumentInputs<'_>,
    templates: &Templates,
    guids: &mut dyn GuidSource,
    output_dir: &Path,
) -> Result<WxsDocument> {
    let content = render_wxs(settings, inputs, templates, guids)?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .fs_context("creating WiX output directory", output_dir)?;
    let path = output_dir.join(format!("{}.wxs", settings.exe_name()));
    tokio::fs::write(&path, &content)
        .await
        .fs_context("writing WiX source", &path)?;

    log::info!("Wrote {}", path.display());
    Ok(WxsDocument { path, content })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacements_apply_in_order() {
        let out = replace_in_string(
            "{{{ProductCode}}} {{A}}",
            &[("{{A}}", "{{B}}".into()), ("{{B}}", "b".into()), ("{{ProductCode}}", "X".into())],
        );
        assert_eq!(out, "{X} b");
    }

    #[test]
    fn marked_lines_are_removed() {
        let source = "one\n    {{remove newline}}\ntwo\r\n  x{{remove newline}}\nthree";
        assert_eq!(remove_marked_lines(source), "one\ntwo\nthree");
    }
}
