//! CPU architecture types and utilities.

/// CPU architecture of the packaged application.
///
/// Determines the package `Platform`, the `Win64` flag on components and the
/// Program Files folder the application lands in.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::Arch;
///
/// let arch = Arch::X86_64;
/// println!("Target architecture: {:?}", arch);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    #[serde(alias = "x64")]
    X86_64,
    /// x86 / i686 (32-bit)
    X86,
    /// Itanium (64-bit)
    Ia64,
    /// AArch64 / ARM64 (64-bit)
    #[serde(alias = "arm64")]
    AArch64,
}

impl Arch {
    /// Parses the architecture names accepted on the command line.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "x64" | "x86_64" | "amd64" => Some(Self::X86_64),
            "x86" | "i686" | "i386" => Some(Self::X86),
            "ia64" => Some(Self::Ia64),
            "arm64" | "aarch64" => Some(Self::AArch64),
            _ => None,
        }
    }

    /// True for every architecture except 32-bit x86.
    pub fn is_64_bit(self) -> bool {
        self != Self::X86
    }
}
