//! Windows platform-specific settings.

use std::path::PathBuf;

/// Windows installer configuration.
///
/// Signing options plus the MSI authoring options in [`MsiSettings`].
///
/// # Configuration
///
/// Add to `msi.toml`:
///
/// ```toml
/// [windows]
/// cert_path = "cert.pfx"
/// password = "secret"
/// timestamp_url = "http://timestamp.digicert.com"
/// ```
///
/// # See Also
///
/// - [`MsiSettings`] - WiX MSI installer configuration
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct WindowsSettings {
    // === Signing Configuration ===
    /// Path to certificate file (.pfx, .pem).
    ///
    /// For PKCS#12 (.pfx), also set `password`.
    ///
    /// Default: None (unsigned)
    pub cert_path: Option<PathBuf>,

    /// Path to private key file (.pem, .key), used by osslsigncode.
    ///
    /// Default: None
    pub key_path: Option<PathBuf>,

    /// Password for the certificate.
    ///
    /// Default: None
    pub password: Option<String>,

    /// Timestamp server URL for signature timestamping.
    ///
    /// Default: None
    pub timestamp_url: Option<String>,

    /// Custom sign parameters passed verbatim after `sign`.
    ///
    /// Example: `/a /f "C:\certs\my cert.pfx" /p hunter2`
    ///
    /// Default: None
    pub sign_command: Option<String>,

    // === Installer Settings ===
    /// WiX MSI installer settings.
    pub msi: MsiSettings,
}

/// Installation scope of the package.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstallMode {
    /// Per-user installation (no admin rights required).
    PerUser,

    /// Per-machine installation (requires admin rights).
    #[default]
    PerMachine,
}

/// Auto-launch configuration: either a plain toggle or a toggle with
/// command-line arguments.
///
/// ```toml
/// [windows.msi.features]
/// auto_launch = { enabled = true, arguments = ["--hidden"] }
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum AutoLaunchSettings {
    /// `auto_launch = true`
    Toggle(bool),
    /// `auto_launch = { enabled = true, arguments = [...] }`
    Options {
        /// Whether the run key is installed
        enabled: bool,
        /// Arguments appended to the launched stub
        #[serde(default)]
        arguments: Vec<String>,
    },
}

impl Default for AutoLaunchSettings {
    fn default() -> Self {
        Self::Toggle(false)
    }
}

impl AutoLaunchSettings {
    /// Whether auto-launch is enabled.
    pub fn enabled(&self) -> bool {
        match self {
            Self::Toggle(enabled) => *enabled,
            Self::Options { enabled, .. } => *enabled,
        }
    }

    /// Command-line arguments for the run key.
    pub fn arguments(&self) -> &[String] {
        match self {
            Self::Toggle(_) => &[],
            Self::Options { arguments, .. } => arguments,
        }
    }
}

/// Optional installable features.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// Ship the self-updater and its registry bookkeeping.
    pub auto_update: bool,

    /// Register the application in the per-session run key.
    pub auto_launch: AutoLaunchSettings,
}

/// Installer dialog images, mapped onto WiX UI variables.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiImages {
    /// `WixUIDialogBmp` (493×312)
    pub background: Option<String>,
    /// `WixUIBannerBmp` (493×58)
    pub banner: Option<String>,
    /// `WixUIExclamationIco`
    pub exclamation_icon: Option<String>,
    /// `WixUIInfoIco`
    pub info_icon: Option<String>,
    /// `WixUINewIco`
    pub new_icon: Option<String>,
    /// `WixUIUpIco`
    pub up_icon: Option<String>,
}

impl UiImages {
    /// Pairs of (WiX variable id, configured value), in declaration order.
    pub fn variables(&self) -> Vec<(&'static str, &str)> {
        [
            ("WixUIDialogBmp", &self.background),
            ("WixUIBannerBmp", &self.banner),
            ("WixUIExclamationIco", &self.exclamation_icon),
            ("WixUIInfoIco", &self.info_icon),
            ("WixUINewIco", &self.new_icon),
            ("WixUIUpIco", &self.up_icon),
        ]
        .into_iter()
        .filter_map(|(id, value)| value.as_deref().map(|v| (id, v)))
        .collect()
    }
}

/// Installer UI options.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiOptions {
    /// Let the user pick the install directory.
    pub choose_directory: bool,
    /// Custom UI template file replacing the built-in one.
    pub template: Option<PathBuf>,
    /// Dialog images.
    pub images: UiImages,
    /// `.wxl` localization files passed to light.
    pub localizations: Vec<String>,
}

/// Installer UI: off, default, or customised.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum UiSettings {
    /// `ui = true` / `ui = false`
    Toggle(bool),
    /// `[windows.msi.ui]` table
    Custom(UiOptions),
}

impl Default for UiSettings {
    fn default() -> Self {
        Self::Toggle(false)
    }
}

impl UiSettings {
    /// Whether any installer UI is shown.
    pub fn enabled(&self) -> bool {
        match self {
            Self::Toggle(enabled) => *enabled,
            Self::Custom(_) => true,
        }
    }

    /// Customisations, if a table was given.
    pub fn options(&self) -> Option<&UiOptions> {
        match self {
            Self::Toggle(_) => None,
            Self::Custom(options) => Some(options),
        }
    }

    /// Mutable customisations, if a table was given.
    pub fn options_mut(&mut self) -> Option<&mut UiOptions> {
        match self {
            Self::Toggle(_) => None,
            Self::Custom(options) => Some(options),
        }
    }
}

/// WiX MSI installer configuration.
///
/// # Configuration
///
/// ```toml
/// [windows.msi]
/// stub_executable = "vendor/StubExecutable.exe"
/// shortcut_folder_name = "Acme"
/// install_mode = "perUser"
///
/// [windows.msi.features]
/// auto_update = true
/// auto_launch = true
/// ```
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct MsiSettings {
    /// AppUserModelID set on shortcuts.
    ///
    /// Default: `com.squirrel.<short_name>.<exe>` lowercased
    pub app_user_model_id: Option<String>,

    /// Toast activator CLSID set on shortcuts, with or without braces.
    pub toast_activator_clsid: Option<String>,

    /// Icon applied to the stub launcher.
    pub icon: Option<PathBuf>,

    /// Extra WiX extensions passed to candle and light.
    pub extensions: Vec<String>,

    /// Extra switches passed to light.
    pub light_switches: Vec<String>,

    /// Cultures passed to light, e.g. `en-US;fr-FR`.
    pub cultures: Option<String>,

    /// Product language id.
    ///
    /// Default: 1033
    pub language: Option<u32>,

    /// Folder under Program Files.
    ///
    /// Default: product name
    pub program_files_folder_name: Option<String>,

    /// Extra folder level below `program_files_folder_name`.
    pub nested_folder_name: Option<String>,

    /// Start menu folder.
    ///
    /// Default: manufacturer
    pub shortcut_folder_name: Option<String>,

    /// Start menu shortcut name.
    ///
    /// Default: product name
    pub shortcut_name: Option<String>,

    /// Installer UI.
    pub ui: UiSettings,

    /// Upgrade code shared across versions.
    ///
    /// Default: random (upgrades will not be detected)
    pub upgrade_code: Option<String>,

    /// Optional features.
    pub features: FeatureSettings,

    /// Launch the application when installation finishes.
    pub auto_run: bool,

    /// Default installation scope.
    pub install_mode: InstallMode,

    /// Value of the `REBOOT` property.
    ///
    /// Default: `ReallySuppress`
    pub reboot_mode: Option<String>,

    /// Install level of the main feature.
    ///
    /// Default: 2
    pub install_level: Option<u32>,

    /// Package is chained by a bootstrapper; skip the visible uninstall name.
    pub bundled: bool,

    /// Stub launcher copied to the install root as `<exe>.exe`.
    pub stub_executable: Option<PathBuf>,

    /// Updater copied to the install root as `Update.exe` when auto-update is on.
    pub updater_executable: Option<PathBuf>,

    /// Group granted write access for the updater.
    ///
    /// Default: `Users`
    pub updater_user_group: Option<String>,
}
