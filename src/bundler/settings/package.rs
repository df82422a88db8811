//! Package metadata and configuration.

/// Package metadata and configuration.
///
/// Product-level information shared by the authored document, the stub
/// launcher resources and the uninstall entry. Maps from the `[package]`
/// table of the MSI manifest.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     product_name: "Acme".into(),
///     version: "1.0.0".into(),
///     description: "ACME is the best company ever".into(),
///     manufacturer: "Acme Technologies".into(),
///     exe: "acme".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct PackageSettings {
    /// Product name displayed to users.
    ///
    /// Shown in Add/Remove Programs and used as the default install folder.
    pub product_name: String,

    /// Version string in semantic versioning format.
    ///
    /// Example: "1.0.0", "0.2.3-beta.1"
    pub version: String,

    /// Brief description of the application.
    pub description: String,

    /// Company name, used as publisher and default shortcut folder.
    pub manufacturer: String,

    /// Name of the main executable inside the application directory.
    ///
    /// A trailing `.exe` is accepted and ignored.
    pub exe: String,

    /// Short product name used in registry keys and the default AppUserModelID.
    ///
    /// Default: None (uses `product_name`)
    #[serde(default)]
    pub short_name: Option<String>,

    /// Homepage URL for the application.
    ///
    /// Default: None
    #[serde(default)]
    pub homepage: Option<String>,
}
