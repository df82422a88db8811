mod common;

use common::{count, settings, write_mock_app};
use kodegen_bundler_msi::bundler::{
    Arch, AutoLaunchSettings, Bundler, FeatureSettings, InstallMode, MsiSettings,
    SettingsBuilder, UiImages, UiOptions, UiSettings, WindowsSettings,
    msi::{
        AuthoredPackage, DocumentInputs, FeatureReferences, INSTALL_INFO_NAME, SeededGuids,
        Templates, render_wxs,
    },
};
use std::path::Path;
use tempfile::TempDir;
use uuid::Uuid;

fn windows(stub: &Path, msi: MsiSettings) -> WindowsSettings {
    WindowsSettings {
        msi: MsiSettings {
            stub_executable: Some(stub.to_path_buf()),
            upgrade_code: Some("2BD6C9C3-1F0D-4E2A-9F55-7D7C3E7B1A10".into()),
            ..msi
        },
        ..Default::default()
    }
}

async fn author(temp: &TempDir, msi: MsiSettings) -> AuthoredPackage {
    let (app, stub) = write_mock_app(temp.path());
    let settings = settings(&app, &temp.path().join("out"), windows(&stub, msi));
    Bundler::new(settings)
        .await
        .unwrap()
        .create_with(SeededGuids::from_seed("slack"))
        .await
        .unwrap()
}

#[tokio::test]
async fn authors_a_complete_document() {
    let temp = TempDir::new().unwrap();
    let package = author(&temp, MsiSettings::default()).await;
    let wxs = &package.wxs;

    assert_eq!(wxs.path, temp.path().join("out").join("slack.wxs"));
    assert_eq!(std::fs::read_to_string(&wxs.path).unwrap(), wxs.content);

    let content = &wxs.content;
    assert!(!content.contains("{{"), "unresolved placeholder in\n{content}");
    assert!(!content.contains("remove newline"));

    let code = package.product_code.hyphenated().to_string().to_uppercase();
    assert!(content.contains(&format!("<Product Id=\"{code}\" Name=\"Slack\"")));
    assert!(content.contains(&format!("Uninstall\\{{{code}}}.msq")));
    assert!(content.contains("Version=\"1.0.0.0\""));
    assert!(content.contains("UpgradeCode=\"2BD6C9C3-1F0D-4E2A-9F55-7D7C3E7B1A10\""));
    assert!(content.contains("Value=\"MsiExec.exe /X {"));

    // seven app files, launcher and install info, seven registry values
    assert_eq!(package.components, 16);
    // plus the shortcut and purge components of the master document
    assert_eq!(count(content, "</Component>"), package.components + 3);
    assert_eq!(count(content, "<ComponentRef Id="), package.components + 3);
}

#[tokio::test]
async fn optional_blocks_are_dropped_with_their_lines() {
    let temp = TempDir::new().unwrap();
    let content = author(&temp, MsiSettings::default()).await.wxs.content;

    assert!(!content.contains("AutoUpdater"));
    assert!(!content.contains("Feature Id=\"AutoLaunch\""));
    assert!(!content.contains("UIRef"));
    assert!(!content.contains("LaunchApplication"));
    assert!(!content.contains("UPDATERUSERGROUP"));
    assert!(!content.contains("ConfigurableDirectory"));
    assert!(content.contains("</Feature>\n\n  </Product>"));
}

#[tokio::test]
async fn stages_install_info() {
    let temp = TempDir::new().unwrap();
    let package = author(&temp, MsiSettings::default()).await;

    let staging = temp.path().join("out").join("staging");
    assert!(staging.join("slack.exe").is_file());
    let info: serde_json::Value =
        serde_json::from_slice(&std::fs::read(staging.join(INSTALL_INFO_NAME)).unwrap()).unwrap();
    assert_eq!(
        info["productCode"],
        format!(
            "{{{}}}",
            package.product_code.hyphenated().to_string().to_uppercase()
        )
    );
    assert_eq!(info["arch"], "x86");
    assert_eq!(info["installVersion"], "1.0.0");
    assert!(
        package
            .wxs
            .content
            .contains(&format!("Name=\"{INSTALL_INFO_NAME}\""))
    );
}

#[tokio::test]
async fn seeded_authoring_is_reproducible() {
    let temp = TempDir::new().unwrap();
    let first = author(&temp, MsiSettings::default()).await;
    let second = author(&temp, MsiSettings::default()).await;
    assert_eq!(first.product_code, second.product_code);
    assert_eq!(first.wxs.content, second.wxs.content);
}

#[tokio::test]
async fn auto_update_and_auto_launch() {
    let temp = TempDir::new().unwrap();
    let updater = temp.path().join("Update.exe");
    std::fs::write(&updater, b"MZ").unwrap();

    let package = author(
        &temp,
        MsiSettings {
            updater_executable: Some(updater.clone()),
            updater_user_group: Some("Everyone".into()),
            features: FeatureSettings {
                auto_update: true,
                auto_launch: AutoLaunchSettings::Options {
                    enabled: true,
                    arguments: vec!["--hidden".into()],
                },
            },
            ..Default::default()
        },
    )
    .await;
    let content = &package.wxs.content;

    assert!(!content.contains("{{"));
    assert!(content.contains("<Property Id=\"UPDATERUSERGROUP\" Value=\"Everyone\" />"));
    assert!(content.contains("<Feature Id=\"AutoUpdater\""));
    assert!(content.contains("<Feature Id=\"AutoLaunch\""));
    assert!(content.contains("Name=\"Update.exe\""));
    assert!(content.contains(
        "Name=\"com.squirrel.slack.slack\" Type=\"string\" Value=\"&quot;[APPLICATIONROOTDIRECTORY]slack.exe&quot; --hidden\""
    ));

    // updater file and three registry values on top of the defaults
    assert_eq!(package.components, 20);
    // SetFolderPermissions joins the master document components
    assert_eq!(count(content, "</Component>"), package.components + 4);
    assert_eq!(count(content, "<ComponentRef Id="), package.components + 4);

    let auto_launch = content
        .split("<Feature Id=\"AutoLaunch\"")
        .nth(1)
        .and_then(|rest| rest.split("</Feature>").next())
        .unwrap();
    assert!(auto_launch.contains("<ComponentRef Id=\"RegistryRunKey\" />"));
    assert_eq!(count(auto_launch, "<ComponentRef"), 1);
}

#[tokio::test]
async fn output_inside_app_dir_is_not_payload() {
    let temp = TempDir::new().unwrap();
    let (app, stub) = write_mock_app(temp.path());
    let out = app.join("installer");
    let settings = settings(&app, &out, windows(&stub, MsiSettings::default()));
    let bundler = Bundler::new(settings).await.unwrap();

    let first = bundler
        .create_with(SeededGuids::from_seed("slack"))
        .await
        .unwrap();
    // the second run sees the first run's staging folder and .wxs
    let second = bundler
        .create_with(SeededGuids::from_seed("slack"))
        .await
        .unwrap();

    assert_eq!(first.components, 16);
    assert_eq!(second.components, 16);
    assert_eq!(first.wxs.content, second.wxs.content);
    let content = &second.wxs.content;
    assert!(!content.contains("Name=\"installer\""));
    assert!(!content.contains("Name=\"slack.wxs\""));
    assert_eq!(count(content, "Name=\"slack.exe\" Id="), 2);
}

#[tokio::test]
async fn output_equal_to_app_dir_is_rejected() {
    let temp = TempDir::new().unwrap();
    let (app, stub) = write_mock_app(temp.path());
    let settings = settings(&app, &app, windows(&stub, MsiSettings::default()));
    let err = Bundler::new(settings).await.unwrap().create().await.unwrap_err();
    assert!(err.to_string().contains("must differ"));
    assert!(!app.join("staging").exists());
}

#[tokio::test]
async fn support_binaries_are_the_staged_launcher() {
    let temp = TempDir::new().unwrap();
    let package = author(&temp, MsiSettings::default()).await;
    let staging = temp.path().join("out").join("staging");
    assert_eq!(package.support_binaries, [staging.join("slack.exe")]);
}

#[tokio::test]
async fn support_binaries_include_staged_updater() {
    let temp = TempDir::new().unwrap();
    let updater = temp.path().join("Squirrel.exe");
    std::fs::write(&updater, b"MZ").unwrap();

    let package = author(
        &temp,
        MsiSettings {
            updater_executable: Some(updater.clone()),
            features: FeatureSettings {
                auto_update: true,
                ..Default::default()
            },
            ..Default::default()
        },
    )
    .await;

    let staging = temp.path().join("out").join("staging");
    assert_eq!(
        package.support_binaries,
        [staging.join("slack.exe"), staging.join("Update.exe")]
    );
    assert!(staging.join("Update.exe").is_file());
    assert!(
        package
            .wxs
            .content
            .contains(&format!("Source=\"{}\"", staging.join("Update.exe").display()))
    );
}

#[tokio::test]
async fn auto_update_requires_updater() {
    let temp = TempDir::new().unwrap();
    let (app, stub) = write_mock_app(temp.path());
    let msi = MsiSettings {
        features: FeatureSettings {
            auto_update: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let settings = settings(&app, &temp.path().join("out"), windows(&stub, msi));
    let err = Bundler::new(settings).await.unwrap().create().await.unwrap_err();
    assert!(err.to_string().contains("updater_executable"));
}

#[tokio::test]
async fn stub_is_required() {
    let temp = TempDir::new().unwrap();
    let (app, _) = write_mock_app(temp.path());
    let settings = settings(&app, &temp.path().join("out"), WindowsSettings::default());
    let err = Bundler::new(settings).await.unwrap().create().await.unwrap_err();
    assert!(err.to_string().contains("stub_executable"));
}

#[tokio::test]
async fn rejects_incomplete_versions() {
    let temp = TempDir::new().unwrap();
    let (app, stub) = write_mock_app(temp.path());
    let mut package = common::package();
    package.version = "1.2".into();
    let settings = SettingsBuilder::new()
        .app_directory(&app)
        .project_out_directory(temp.path().join("out"))
        .package_settings(package)
        .windows_settings(windows(&stub, MsiSettings::default()))
        .build()
        .unwrap();
    assert!(Bundler::new(settings).await.unwrap().create().await.is_err());
}

#[tokio::test]
async fn missing_app_directory_is_rejected() {
    let temp = TempDir::new().unwrap();
    let settings = settings(
        &temp.path().join("nope"),
        &temp.path().join("out"),
        WindowsSettings::default(),
    );
    assert!(Bundler::new(settings).await.is_err());
}

fn render(arch: Arch, msi: MsiSettings) -> String {
    let settings = SettingsBuilder::new()
        .app_directory("app")
        .project_out_directory("out")
        .package_settings(common::package())
        .windows_settings(WindowsSettings {
            msi,
            ..Default::default()
        })
        .arch(arch)
        .build()
        .unwrap();
    let references = FeatureReferences::default();
    let inputs = DocumentInputs {
        directories: "        <Directory Id=\"APPLICATIONROOTDIRECTORY\" Name=\"Slack\" />",
        references: &references,
        product_code: Uuid::nil(),
        ui_template: None,
    };
    render_wxs(
        &settings,
        &inputs,
        &Templates::new().unwrap(),
        &mut SeededGuids::from_seed("render"),
    )
    .unwrap()
}

#[test]
fn architecture_selects_program_files() {
    let x86 = render(Arch::X86, MsiSettings::default());
    assert!(x86.contains("<Directory Id=\"ProgramFilesFolder\">"));
    assert!(x86.contains("Platform=\"x86\""));
    assert!(x86.contains("Win64=\"no\""));

    let x64 = render(Arch::X86_64, MsiSettings::default());
    assert!(x64.contains("<Directory Id=\"ProgramFiles64Folder\">"));
    assert!(x64.contains("Platform=\"x64\""));
    assert!(!x64.contains("Win64=\"no\""));

    let arm = render(Arch::AArch64, MsiSettings::default());
    assert!(arm.contains("Platform=\"arm64\""));
}

#[test]
fn product_code_is_braced_in_registry_keys() {
    let content = render(Arch::X86, MsiSettings::default());
    assert!(content.contains("<Product Id=\"00000000-0000-0000-0000-000000000000\""));
    assert!(content.contains("Uninstall\\{00000000-0000-0000-0000-000000000000}.msq"));
}

#[test]
fn per_user_install_mode() {
    let per_user = render(
        Arch::X86,
        MsiSettings {
            install_mode: InstallMode::PerUser,
            ..Default::default()
        },
    );
    assert!(per_user.contains("InstallScope=\"perUser\""));
    assert!(per_user.contains("<Property Id=\"MSIINSTALLPERUSER\" Secure=\"yes\" Value=\"1\" />"));

    let per_machine = render(Arch::X86, MsiSettings::default());
    assert!(per_machine.contains("InstallScope=\"perMachine\""));
    assert!(per_machine.contains("<Property Id=\"REBOOT\" Value=\"ReallySuppress\" />"));
    assert!(per_machine.contains("<Property Id=\"INSTALLLEVEL\" Value=\"2\" />"));
}

#[test]
fn minimal_ui_when_toggled_on() {
    let content = render(
        Arch::X86,
        MsiSettings {
            ui: UiSettings::Toggle(true),
            ..Default::default()
        },
    );
    assert!(content.contains("<UIRef Id=\"WixUI_Minimal\" />"));
    assert!(!content.contains("WixVariable"));
    assert!(!content.contains("ConfigurableDirectory"));
}

#[test]
fn install_dir_ui_with_images() {
    let content = render(
        Arch::X86,
        MsiSettings {
            ui: UiSettings::Custom(UiOptions {
                choose_directory: true,
                images: UiImages {
                    background: Some("assets/background.bmp".into()),
                    up_icon: Some("assets/up.ico".into()),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        },
    );
    assert!(content.contains("<UIRef Id=\"WixUI_InstallDir\" />"));
    assert!(content.contains("ConfigurableDirectory=\"APPLICATIONROOTDIRECTORY\""));
    assert!(content.contains("<WixVariable Id=\"WixUIDialogBmp\" Value=\"assets/background.bmp\" />"));
    assert!(content.contains("<WixVariable Id=\"WixUIUpIco\" Value=\"assets/up.ico\" />"));
    assert!(!content.contains("WixUIBannerBmp"));
}

#[test]
fn shortcut_properties() {
    let content = render(
        Arch::X86,
        MsiSettings {
            toast_activator_clsid: Some("DB9D4A4C-2B0F-4C0C-9C8E-2B5E8F0F4B11".into()),
            ..Default::default()
        },
    );
    assert!(content.contains(
        "<ShortcutProperty Key=\"System.AppUserModel.ID\" Value=\"com.squirrel.slack.slack\" />"
    ));
    assert!(content.contains(
        "<ShortcutProperty Key=\"System.AppUserModel.ToastActivatorCLSID\" Value=\"{DB9D4A4C-2B0F-4C0C-9C8E-2B5E8F0F4B11}\" />"
    ));
}

#[test]
fn missing_upgrade_code_is_generated() {
    let content = render(Arch::X86, MsiSettings::default());
    let upgrade = content
        .split("UpgradeCode=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap();
    assert!(Uuid::parse_str(upgrade).is_ok());
}
