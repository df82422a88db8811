use kodegen_bundler_msi::bundler::{
    AutoLaunchSettings, FeatureSettings,
    msi::{
        Feature, RUN_KEY, Registry, RegistryValueType, UNINSTALL_KEY, find_duplicate_ids,
        plan_registry, run_key_value,
    },
};

fn ids(registry: &[Registry]) -> Vec<&str> {
    registry.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn default_plan_is_uninstall_bookkeeping() {
    let registry = plan_registry(&FeatureSettings::default(), false);
    assert_eq!(
        ids(&registry),
        [
            "RegistryInstallPath",
            "UninstallDisplayName",
            "UninstallPublisher",
            "UninstallDisplayVersion",
            "UninstallModifyString",
            "UninstallString",
            "UninstallDisplayIcon",
        ]
    );
    for entry in &registry {
        assert_eq!(entry.feature, Feature::Main);
        assert_eq!(entry.key, UNINSTALL_KEY);
        assert!(entry.force_delete_on_uninstall);
        assert!(entry.permission.is_none());
    }
    assert_eq!(registry[0].value, "[APPLICATIONROOTDIRECTORY]");
    assert_eq!(registry[5].value_type, RegistryValueType::Expandable);
    assert_eq!(registry[5].value, "MsiExec.exe /X {{{ProductCode}}}");
}

#[test]
fn bundled_packages_skip_display_name() {
    let registry = plan_registry(&FeatureSettings::default(), true);
    assert!(!ids(&registry).contains(&"UninstallDisplayName"));
    assert_eq!(registry.len(), 6);
}

#[test]
fn auto_update_entries_carry_auto_update_affinity() {
    let features = FeatureSettings {
        auto_update: true,
        ..Default::default()
    };
    let registry = plan_registry(&features, false);
    let auto_update: Vec<&Registry> = registry
        .iter()
        .filter(|r| r.feature == Feature::AutoUpdate)
        .collect();

    assert_eq!(
        auto_update.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        ["SetUninstallDisplayVersionPermissions", "AutoUpdateEnabled"]
    );
    let permissions = auto_update[0];
    assert!(permissions.force_create_on_install);
    let permission = permissions.permission.as_ref().unwrap();
    assert_eq!(permission.user, "[UPDATERUSERGROUP]");
    assert!(permission.generic_all);
    assert_eq!(auto_update[1].value_type, RegistryValueType::Integer);
}

#[test]
fn disabled_features_contribute_nothing() {
    let registry = plan_registry(&FeatureSettings::default(), false);
    assert!(registry.iter().all(|r| r.feature == Feature::Main));
}

#[test]
fn auto_launch_run_key() {
    let features = FeatureSettings {
        auto_launch: AutoLaunchSettings::Toggle(true),
        ..Default::default()
    };
    let registry = plan_registry(&features, false);
    let run = registry.last().unwrap();

    assert_eq!(run.id, "RegistryRunKey");
    assert_eq!(run.feature, Feature::AutoLaunch);
    assert_eq!(run.key, RUN_KEY);
    assert_eq!(
        run.value,
        "&quot;[APPLICATIONROOTDIRECTORY]{{ApplicationBinary}}.exe&quot;"
    );
}

#[test]
fn auto_launch_arguments_are_appended() {
    let features = FeatureSettings {
        auto_launch: AutoLaunchSettings::Options {
            enabled: true,
            arguments: vec!["--flag".into(), "value".into()],
        },
        ..Default::default()
    };
    let registry = plan_registry(&features, false);
    let run = registry.iter().find(|r| r.id == "RegistryRunKey").unwrap();
    assert_eq!(
        run.value,
        "&quot;[APPLICATIONROOTDIRECTORY]{{ApplicationBinary}}.exe&quot; --flag value"
    );
}

#[test]
fn quotes_in_arguments_are_escaped() {
    let value = run_key_value(&["--name=\"My App\"".to_string()]);
    assert!(value.ends_with(" --name=&quot;My App&quot;"));
    assert!(!value.contains('"'));
}

#[test]
fn disabled_auto_launch_with_arguments_has_no_run_key() {
    let features = FeatureSettings {
        auto_launch: AutoLaunchSettings::Options {
            enabled: false,
            arguments: vec!["--hidden".into()],
        },
        ..Default::default()
    };
    assert!(
        plan_registry(&features, false)
            .iter()
            .all(|r| r.id != "RegistryRunKey")
    );
}

#[test]
fn planned_ids_are_unique() {
    let features = FeatureSettings {
        auto_update: true,
        auto_launch: AutoLaunchSettings::Toggle(true),
    };
    assert!(find_duplicate_ids(&plan_registry(&features, false)).is_empty());
}

#[test]
fn duplicate_ids_are_reported_once() {
    let registry = vec![
        Registry::new("A", "key", "a", "1"),
        Registry::new("B", "key", "b", "1"),
        Registry::new("A", "key", "c", "1"),
        Registry::new("A", "key", "d", "1"),
    ];
    assert_eq!(find_duplicate_ids(&registry), ["A"]);
}
