//! Registry values authored by the installer.
//!
//! The planner decides *which* values exist and which feature they belong to.
//! Keys and values may carry installer placeholders (`{{Manufacturer}}`,
//! `{{{ProductCode}}}`, ...) that are only resolved when the document is
//! assembled.

use super::{Feature, ROOTDIR_NAME};
use crate::bundler::settings::FeatureSettings;
use std::collections::HashSet;

/// Uninstall entry written in place of the one Windows Installer generates.
pub const UNINSTALL_KEY: &str =
    "SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Uninstall\\{{{ProductCode}}}.msq";

/// Per-product settings key.
pub const PRODUCT_REG_KEY: &str = "SOFTWARE\\{{Manufacturer}}\\{{ApplicationShortName}}";

/// Per-session run key.
pub const RUN_KEY: &str = "SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Run";

/// Registry hive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistryRoot {
    /// HKEY_LOCAL_MACHINE
    Hklm,
    /// HKEY_CURRENT_USER
    Hkcu,
    /// HKLM for per-machine installs, HKCU for per-user installs
    Hkmu,
    /// HKEY_CLASSES_ROOT
    Hkcr,
    /// HKEY_USERS
    Hku,
}

impl RegistryRoot {
    /// WiX spelling of the hive.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hklm => "HKLM",
            Self::Hkcu => "HKCU",
            Self::Hkmu => "HKMU",
            Self::Hkcr => "HKCR",
            Self::Hku => "HKU",
        }
    }
}

/// Registry value type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistryValueType {
    /// REG_SZ
    String,
    /// REG_DWORD
    Integer,
    /// REG_BINARY
    Binary,
    /// REG_EXPAND_SZ
    Expandable,
    /// REG_MULTI_SZ
    MultiString,
}

impl RegistryValueType {
    /// WiX spelling of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Binary => "binary",
            Self::Expandable => "expandable",
            Self::MultiString => "multiString",
        }
    }
}

/// Access granted on a registry key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Permission {
    /// User or group, may be an installer property like `[UPDATERUSERGROUP]`.
    pub user: String,
    /// Grant full control.
    pub generic_all: bool,
}

/// One registry value written by the installer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Registry {
    /// Component id; must be unique across the registry list.
    pub id: String,
    pub root: RegistryRoot,
    pub key: String,
    pub name: String,
    pub value: String,
    pub value_type: RegistryValueType,
    pub feature: Feature,
    pub force_create_on_install: bool,
    pub force_delete_on_uninstall: bool,
    pub permission: Option<Permission>,
}

impl Registry {
    /// A `main` string value under HKMU with no flags set.
    pub fn new(id: &str, key: &str, name: &str, value: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            root: RegistryRoot::Hkmu,
            key: key.to_string(),
            name: name.to_string(),
            value: value.into(),
            value_type: RegistryValueType::String,
            feature: Feature::Main,
            force_create_on_install: false,
            force_delete_on_uninstall: false,
            permission: None,
        }
    }

    fn value_type(mut self, value_type: RegistryValueType) -> Self {
        self.value_type = value_type;
        self
    }

    fn feature(mut self, feature: Feature) -> Self {
        self.feature = feature;
        self
    }

    fn force_create(mut self) -> Self {
        self.force_create_on_install = true;
        self
    }

    fn force_delete(mut self) -> Self {
        self.force_delete_on_uninstall = true;
        self
    }

    fn permission(mut self, user: &str) -> Self {
        self.permission = Some(Permission {
            user: user.to_string(),
            generic_all: true,
        });
        self
    }
}

/// Computes the registry values for a package.
///
/// `bundled` packages are chained by a bootstrapper and do not get their own
/// visible uninstall name.
pub fn plan_registry(features: &FeatureSettings, bundled: bool) -> Vec<Registry> {
    let mut registry = Vec::new();

    // Tracks the chosen install folder so uninstall can purge it.
    registry.push(
        Registry::new(
            "RegistryInstallPath",
            UNINSTALL_KEY,
            "InstallPath",
            format!("[{ROOTDIR_NAME}]"),
        )
        .force_delete(),
    );

    // The generated uninstall entry is hidden; this one replaces it.
    if !bundled {
        registry.push(
            Registry::new(
                "UninstallDisplayName",
                UNINSTALL_KEY,
                "DisplayName",
                "[VisibleProductName]",
            )
            .force_delete(),
        );
    }

    registry.push(
        Registry::new(
            "UninstallPublisher",
            UNINSTALL_KEY,
            "Publisher",
            "{{Manufacturer}}",
        )
        .force_delete(),
    );
    registry.push(
        Registry::new(
            "UninstallDisplayVersion",
            UNINSTALL_KEY,
            "DisplayVersion",
            "{{SemanticVersion}}",
        )
        .force_delete(),
    );
    registry.push(
        Registry::new(
            "UninstallModifyString",
            UNINSTALL_KEY,
            "ModifyPath",
            "MsiExec.exe /I {{{ProductCode}}}",
        )
        .value_type(RegistryValueType::Expandable)
        .force_delete(),
    );
    registry.push(
        Registry::new(
            "UninstallString",
            UNINSTALL_KEY,
            "UninstallString",
            "MsiExec.exe /X {{{ProductCode}}}",
        )
        .value_type(RegistryValueType::Expandable)
        .force_delete(),
    );
    registry.push(
        Registry::new(
            "UninstallDisplayIcon",
            UNINSTALL_KEY,
            "DisplayIcon",
            format!("[{ROOTDIR_NAME}]{{{{ApplicationBinary}}}}.exe"),
        )
        .value_type(RegistryValueType::Expandable)
        .force_delete(),
    );

    if features.auto_update {
        // Same value again, this time writable by the updater's group.
        registry.push(
            Registry::new(
                "SetUninstallDisplayVersionPermissions",
                UNINSTALL_KEY,
                "DisplayVersion",
                "{{SemanticVersion}}",
            )
            .feature(Feature::AutoUpdate)
            .permission("[UPDATERUSERGROUP]")
            .force_create(),
        );
        registry.push(
            Registry::new(
                "AutoUpdateEnabled",
                PRODUCT_REG_KEY,
                "AutoUpdate",
                "[AUTOUPDATEENABLED]",
            )
            .value_type(RegistryValueType::Integer)
            .feature(Feature::AutoUpdate)
            .force_delete(),
        );
    }

    if features.auto_launch.enabled() {
        registry.push(
            Registry::new(
                "RegistryRunKey",
                RUN_KEY,
                "{{AppUserModelId}}",
                run_key_value(features.auto_launch.arguments()),
            )
            .feature(Feature::AutoLaunch),
        );
    }

    registry
}

/// Quoted stub path followed by the arguments, with quotes in the arguments
/// written as `&quot;` because the value ends up in an XML attribute.
pub fn run_key_value(arguments: &[String]) -> String {
    let args = if arguments.is_empty() {
        String::new()
    } else {
        format!(" {}", arguments.join(" ")).replace('"', "&quot;")
    };
    format!("&quot;[{ROOTDIR_NAME}]{{{{ApplicationBinary}}}}.exe&quot;{args}")
}

/// Ids that occur more than once, in first-seen order.
pub fn find_duplicate_ids(registry: &[Registry]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for entry in registry {
        if !seen.insert(entry.id.as_str()) && !duplicates.contains(&entry.id.as_str()) {
            duplicates.push(entry.id.as_str());
        }
    }
    duplicates
}
