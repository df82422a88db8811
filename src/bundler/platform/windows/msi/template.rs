//! WiX templates.
//!
//! Fragment templates are rendered with Handlebars (HTML escaping disabled).
//! The master document and the UI block use literal `<!-- {{Slot}} -->` and
//! `{{Placeholder}}` markers that are substituted by the document assembler.

use crate::bundler::error::Result;
use handlebars::Handlebars;
use serde::Serialize;

pub const DIRECTORY: &str = "directory";
pub const DIRECTORY_NESTED_INSTALL: &str = "directory-nested-install";
pub const FILE_COMPONENT: &str = "file-component";
pub const REGISTRY_COMPONENT: &str = "registry-component";
pub const PERMISSION: &str = "permission";
pub const COMPONENT_REF: &str = "component-ref";
pub const SHORTCUT_PROPERTY: &str = "shortcut-property";
pub const WIX_VARIABLE: &str = "wix-variable";

const DIRECTORY_TEMPLATE: &str = r#"{{indent}}<Directory Id="{{directory_id}}" Name="{{directory_name}}">
{{#if children}}{{children}}
{{/if}}{{indent}}</Directory>"#;

const DIRECTORY_NESTED_INSTALL_TEMPLATE: &str = r#"{{indent}}<Directory Id="{{parent_id}}" Name="{{directory_name}}">
{{indent}}  <Directory Id="{{directory_id}}" Name="{{nested_directory_name}}">
{{#if children}}{{children}}
{{/if}}{{indent}}  </Directory>
{{indent}}</Directory>"#;

const FILE_COMPONENT_TEMPLATE: &str = r#"{{indent}}<Component Id="{{component_id}}" Guid="{{guid}}" Win64="{{win64}}">
{{indent}}  <File Name="{{name}}" Id="{{file_id}}" Source="{{source}}" KeyPath="yes" />
{{indent}}</Component>"#;

const REGISTRY_COMPONENT_TEMPLATE: &str = r#"{{indent}}<Component Id="{{component_id}}" Guid="{{guid}}" Win64="{{win64}}">
{{indent}}  <RegistryKey Root="{{root}}" Key="{{key}}" ForceCreateOnInstall="{{force_create_on_install}}" ForceDeleteOnUninstall="{{force_delete_on_uninstall}}">
{{indent}}    <RegistryValue Name="{{name}}" Type="{{value_type}}" Value="{{value}}" KeyPath="yes" />
{{#if permission}}{{permission}}
{{/if}}{{indent}}  </RegistryKey>
{{indent}}</Component>"#;

const PERMISSION_TEMPLATE: &str =
    r#"{{indent}}<util:PermissionEx User="{{user}}" GenericAll="{{generic_all}}" />"#;

const COMPONENT_REF_TEMPLATE: &str = r#"{{indent}}<ComponentRef Id="{{component_id}}" />"#;

const SHORTCUT_PROPERTY_TEMPLATE: &str =
    r#"          <ShortcutProperty Key="{{key}}" Value="{{value}}" />"#;

const WIX_VARIABLE_TEMPLATE: &str = r#"    <WixVariable Id="{{id}}" Value="{{value}}" />"#;

/// Master document. Slots are `<!-- {{Name}} -->`, placeholders `{{Name}}`.
pub const WIX_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Wix xmlns="http://schemas.microsoft.com/wix/2006/wi" xmlns:util="http://schemas.microsoft.com/wix/UtilExtension">
  <Product Id="{{ProductCode}}" Name="{{ApplicationName}}" Language="{{Language}}" Version="{{Version}}" Manufacturer="{{Manufacturer}}" UpgradeCode="{{UpgradeCode}}">
    <Package InstallerVersion="500" Compressed="yes" InstallScope="{{PackageScope}}" Platform="{{Platform}}" Description="{{ApplicationDescription}}" Manufacturer="{{Manufacturer}}" />
    <MajorUpgrade AllowSameVersionUpgrades="yes" DowngradeErrorMessage="A newer version of {{ApplicationName}} is already installed." />
    <MediaTemplate EmbedCab="yes" />

    <Property Id="ALLUSERS" Secure="yes" Value="2" />
    <Property Id="MSIINSTALLPERUSER" Secure="yes" Value="{{InstallPerUser}}" />
    <Property Id="ARPSYSTEMCOMPONENT" Value="1" />
    <Property Id="REBOOT" Value="{{RebootMode}}" />
    <Property Id="INSTALLLEVEL" Value="{{InstallLevel}}" />
    <Property Id="INSTALLPATH">
      <RegistrySearch Key="SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall\{{{ProductCode}}}.msq" Root="HKMU" Type="raw" Id="APPINSTALLPATHSEARCH" Name="InstallPath" />
    </Property>
    <!-- {{AutoUpdatePermissions}} -->

    <Directory Id="TARGETDIR" Name="SourceDir">
      <Directory Id="{{ProgramFilesFolder}}">
<!-- {{Directories}} -->
      </Directory>
      <Directory Id="ProgramMenuFolder">
        <Directory Id="ApplicationProgramsFolder" Name="{{ShortcutFolderName}}" />
      </Directory>
      <Directory Id="DesktopFolder" Name="Desktop" />
    </Directory>

    <DirectoryRef Id="ApplicationProgramsFolder">
      <Component Id="ApplicationShortcut" Guid="{{ApplicationShortcutGuid}}" Win64="{{Win64YesNo}}">
        <Shortcut Id="ApplicationStartMenuShortcut" Name="{{ShortcutName}}" Description="{{ApplicationDescription}}" Target="[APPLICATIONROOTDIRECTORY]{{ApplicationBinary}}.exe" WorkingDirectory="APPLICATIONROOTDIRECTORY">
<!-- {{ShortcutProperties}} -->
        </Shortcut>
        <RemoveFolder Id="CleanUpShortCut" Directory="ApplicationProgramsFolder" On="uninstall" />
        <RegistryValue Root="HKCU" Key="Software\{{Manufacturer}}\{{ApplicationName}}" Name="StartMenuShortcut" Type="integer" Value="1" KeyPath="yes" />
      </Component>
    </DirectoryRef>

    <DirectoryRef Id="DesktopFolder">
      <Component Id="DesktopShortcut" Guid="{{DesktopShortcutGuid}}" Win64="{{Win64YesNo}}">
        <Shortcut Id="ApplicationDesktopShortcut" Name="{{ShortcutName}}" Description="{{ApplicationDescription}}" Target="[APPLICATIONROOTDIRECTORY]{{ApplicationBinary}}.exe" WorkingDirectory="APPLICATIONROOTDIRECTORY" />
        <RegistryValue Root="HKCU" Key="Software\{{Manufacturer}}\{{ApplicationName}}" Name="DesktopShortcut" Type="integer" Value="1" KeyPath="yes" />
      </Component>
    </DirectoryRef>

    <DirectoryRef Id="APPLICATIONROOTDIRECTORY">
      <Component Id="PurgeOnUninstall" Guid="{{RandomGuid}}" Win64="{{Win64YesNo}}">
        <RegistryValue Root="HKMU" Key="SOFTWARE\{{Manufacturer}}\{{ApplicationShortName}}" Name="PurgeOnUninstall" Type="integer" Value="1" KeyPath="yes" />
        <util:RemoveFolderEx On="uninstall" Property="INSTALLPATH" />
      </Component>
    </DirectoryRef>
    <!-- {{AutoRun}} -->

    <Feature Id="MainApplication" Title="Main Application" Level="1" Absent="disallow" Display="expand" {{ConfigurableDirectory}}>
<!-- {{ComponentRefs}} -->
      <ComponentRef Id="ApplicationShortcut" />
      <ComponentRef Id="DesktopShortcut" />
      <ComponentRef Id="PurgeOnUninstall" />
      <!-- {{AutoUpdateFeature}} -->
      <!-- {{AutoLaunchFeature}} -->
    </Feature>

    <!-- {{UI}} -->
  </Product>
</Wix>
"#;

/// Default UI block. `{{UIRef}}` selects the dialog set.
pub const UI_TEMPLATE: &str = r#"<Property Id="WIXUI_INSTALLDIR" Value="APPLICATIONROOTDIRECTORY" />
    <UIRef Id="{{UIRef}}" />
    <UIRef Id="WixUI_ErrorProgressText" />
    <!-- {{WixVariables}} -->"#;

/// Properties and the folder permission needed by the updater.
pub const UPDATER_PERMISSIONS_TEMPLATE: &str = r#"<Property Id="UPDATERUSERGROUP" Value="{{UpdaterUserGroup}}" />
    <Property Id="AUTOUPDATEENABLED" Value="1" />
    <DirectoryRef Id="APPLICATIONROOTDIRECTORY">
      <Component Id="SetFolderPermissions" Guid="{{UpdaterPermissionsGuid}}" Win64="{{Win64YesNo}}">
        <CreateFolder>
          <util:PermissionEx User="[UPDATERUSERGROUP]" GenericAll="yes" />
        </CreateFolder>
      </Component>
    </DirectoryRef>"#;

pub const UPDATER_FEATURE_TEMPLATE: &str = r#"<Feature Id="AutoUpdater" Title="Auto Updater" Level="3" Absent="allow" AllowAdvertise="no">
        <ComponentRef Id="SetFolderPermissions" />
<!-- {{UpdaterComponentRefs}} -->
      </Feature>"#;

pub const AUTO_LAUNCH_FEATURE_TEMPLATE: &str = r#"<Feature Id="AutoLaunch" Title="Launch On Login" Level="2" Absent="allow" AllowAdvertise="no">
<!-- {{AutoLaunchComponentRefs}} -->
      </Feature>"#;

pub const AUTO_RUN_TEMPLATE: &str = r#"<CustomAction Id="LaunchApplication" Directory="APPLICATIONROOTDIRECTORY" ExeCommand="&quot;[APPLICATIONROOTDIRECTORY]{{ApplicationBinary}}.exe&quot;" Return="asyncNoWait" Impersonate="yes" />
    <InstallExecuteSequence>
      <Custom Action="LaunchApplication" After="InstallFinalize">NOT Installed AND NOT REMOVE</Custom>
    </InstallExecuteSequence>"#;

/// Registered fragment templates.
#[derive(Debug)]
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    /// Registers the built-in fragment templates.
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);

        for (name, source) in [
            (DIRECTORY, DIRECTORY_TEMPLATE),
            (DIRECTORY_NESTED_INSTALL, DIRECTORY_NESTED_INSTALL_TEMPLATE),
            (FILE_COMPONENT, FILE_COMPONENT_TEMPLATE),
            (REGISTRY_COMPONENT, REGISTRY_COMPONENT_TEMPLATE),
            (PERMISSION, PERMISSION_TEMPLATE),
            (COMPONENT_REF, COMPONENT_REF_TEMPLATE),
            (SHORTCUT_PROPERTY, SHORTCUT_PROPERTY_TEMPLATE),
            (WIX_VARIABLE, WIX_VARIABLE_TEMPLATE),
        ] {
            registry.register_template_string(name, source)?;
        }

        Ok(Self { registry })
    }

    /// Renders the fragment template `name` with `data`.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        Ok(self.registry.render(name, data)?)
    }
}
