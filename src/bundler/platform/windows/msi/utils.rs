//! MSI utility functions.
//!
//! Architecture mapping, version formatting and XML escaping.

use crate::bundler::{
    error::{Error, Result},
    settings::Arch,
};

/// Map architecture to the WiX platform string.
pub fn map_arch(arch: Arch) -> &'static str {
    match arch {
        Arch::X86_64 => "x64",
        Arch::X86 => "x86",
        Arch::Ia64 => "ia64",
        Arch::AArch64 => "arm64",
    }
}

/// `Win64` attribute value for components of `arch`.
pub fn win64_yes_no(arch: Arch) -> &'static str {
    if arch.is_64_bit() { "yes" } else { "no" }
}

/// Program files directory id for `arch`.
pub fn program_files_folder(arch: Arch) -> &'static str {
    if arch.is_64_bit() {
        "ProgramFiles64Folder"
    } else {
        "ProgramFilesFolder"
    }
}

/// Format a version for the MSI `ProductVersion` property.
///
/// Windows Installer wants four numeric parts:
/// - "1.2.3.4" -> "1.2.3.4"
/// - "1.2.3" -> "1.2.3.0"
/// - "1.2.3-beta.1" -> "1.2.3.0"
/// - "1.2" -> error
pub fn windows_compliant_version(version: &str) -> Result<String> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() == 4 && parts.iter().all(|p| !p.is_empty() && p.parse::<u32>().is_ok()) {
        return Ok(version.to_string());
    }

    let parsed = semver::Version::parse(version)
        .map_err(|e| Error::InvalidVersion(format!("{version}: {e}")))?;
    Ok(format!("{}.{}.{}.0", parsed.major, parsed.minor, parsed.patch))
}

/// Escape text for use inside an XML attribute.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Wrap a CLSID in braces unless it already is.
pub fn braced_clsid(clsid: &str) -> String {
    if clsid.starts_with('{') && clsid.ends_with('}') {
        clsid.to_string()
    } else {
        format!("{{{clsid}}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliant_versions() {
        assert_eq!(windows_compliant_version("1.2.3.4").unwrap(), "1.2.3.4");
        assert_eq!(windows_compliant_version("1.2.3").unwrap(), "1.2.3.0");
        assert_eq!(windows_compliant_version("2.0.0-beta.7").unwrap(), "2.0.0.0");
        assert!(windows_compliant_version("1.2").is_err());
        assert!(windows_compliant_version("1.2.3.beta").is_err());
    }

    #[test]
    fn arch_strings() {
        assert_eq!(map_arch(Arch::AArch64), "arm64");
        assert_eq!(win64_yes_no(Arch::X86), "no");
        assert_eq!(program_files_folder(Arch::Ia64), "ProgramFiles64Folder");
    }

    #[test]
    fn escapes_attribute_text() {
        assert_eq!(escape_xml(r#"a&b<"c">'"#), "a&amp;b&lt;&quot;c&quot;&gt;&apos;");
    }

    #[test]
    fn clsid_braces() {
        assert_eq!(braced_clsid("abc"), "{abc}");
        assert_eq!(braced_clsid("{abc}"), "{abc}");
    }
}
