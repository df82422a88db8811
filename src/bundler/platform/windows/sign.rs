//! Authenticode signing of the staged executables and the built installer.
//!
//! Uses `signtool` on Windows hosts and `osslsigncode` elsewhere. A custom
//! `sign_command` replaces the generated `signtool` parameters.

use crate::{
    bail,
    bundler::{
        error::{Error, ErrorExt, Result},
        settings::{Settings, WindowsSettings},
    },
};
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

static ARG_RE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#""[^"]*"|\S+"#));

/// Signing tool flavour.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SignTool {
    Signtool,
    Osslsigncode,
}

impl SignTool {
    /// Tool for the host platform.
    pub fn host() -> Self {
        if cfg!(windows) {
            SignTool::Signtool
        } else {
            SignTool::Osslsigncode
        }
    }

    fn binary(self) -> &'static str {
        match self {
            SignTool::Signtool => "signtool",
            SignTool::Osslsigncode => "osslsigncode",
        }
    }
}

/// Whether signing is configured.
pub fn should_sign(settings: &Settings) -> bool {
    let windows = settings.windows_settings();
    windows.cert_path.is_some() || windows.sign_command.is_some()
}

/// Rejects configurations the host's signing tool cannot honour.
///
/// A custom `sign_command` is passed to `signtool` only. Without a
/// certificate there is nothing `osslsigncode` could sign with.
pub fn check_host_support(windows: &WindowsSettings, tool: SignTool) -> Result<()> {
    if tool == SignTool::Osslsigncode
        && windows.sign_command.is_some()
        && windows.cert_path.is_none()
    {
        bail!(
            "sign_command is only used by signtool on Windows hosts; \
             set cert_path and password to sign with osslsigncode"
        );
    }
    Ok(())
}

/// Splits a parameter string on whitespace, keeping double-quoted runs
/// (quotes included) together.
pub fn split_params(params: &str) -> Vec<String> {
    match ARG_RE.as_ref() {
        Ok(re) => re.find_iter(params).map(|m| m.as_str().to_string()).collect(),
        Err(_) => params.split_whitespace().map(str::to_string).collect(),
    }
}

/// Arguments for signing `file` with `tool`.
///
/// # Errors
///
/// Fails when a certificate is configured without a password, or when
/// nothing to sign with is configured.
pub fn sign_args(tool: SignTool, windows: &WindowsSettings, file: &Path) -> Result<Vec<String>> {
    let file = file.display().to_string();

    if tool == SignTool::Signtool
        && let Some(command) = &windows.sign_command
    {
        let mut args = vec!["sign".to_string()];
        args.extend(split_params(command));
        args.push(file);
        return Ok(args);
    }

    check_host_support(windows, tool)?;
    let Some(cert) = &windows.cert_path else {
        bail!("no certificate configured for signing");
    };
    let Some(password) = &windows.password else {
        bail!(
            "a certificate ({}) requires a password for signing",
            cert.display()
        );
    };

    let args = match tool {
        SignTool::Signtool => {
            let mut args = vec![
                "sign".to_string(),
                "/a".into(),
                "/f".into(),
                cert.display().to_string(),
                "/p".into(),
                password.clone(),
            ];
            if let Some(url) = &windows.timestamp_url {
                args.extend(["/tr".into(), url.clone(), "/td".into(), "sha256".into()]);
            }
            args.push(file);
            args
        }
        SignTool::Osslsigncode => {
            let mut args = vec!["sign".to_string()];
            match &windows.key_path {
                Some(key) => args.extend([
                    "-certs".into(),
                    cert.display().to_string(),
                    "-key".into(),
                    key.display().to_string(),
                ]),
                None => args.extend(["-pkcs12".into(), cert.display().to_string()]),
            }
            args.extend(["-pass".into(), password.clone(), "-h".into(), "sha256".into()]);
            if let Some(url) = &windows.timestamp_url {
                args.extend(["-ts".into(), url.clone()]);
            }
            args.extend(["-in".into(), file.clone(), "-out".into(), signed_path(&file)]);
            args
        }
    };
    Ok(args)
}

fn signed_path(file: &str) -> String {
    format!("{file}.signed")
}

/// Signs `file` in place.
pub async fn sign_file(file: &Path, settings: &Settings) -> Result<()> {
    let tool = SignTool::host();
    let args = sign_args(tool, settings.windows_settings(), file)?;
    log::info!("Signing {} with {}", file.display(), tool.binary());

    let output = tokio::process::Command::new(tool.binary())
        .args(&args)
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: tool.binary().to_string(),
            error,
        })?;

    if !output.status.success() {
        return Err(Error::SignFailed {
            tool: tool.binary().to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        });
    }

    if tool == SignTool::Osslsigncode {
        let signed = PathBuf::from(signed_path(&file.display().to_string()));
        tokio::fs::rename(&signed, file)
            .await
            .fs_context("replacing file with signed copy", &signed)?;
    }
    Ok(())
}
