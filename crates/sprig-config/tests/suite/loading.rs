use pretty_assertions::assert_eq;
use sprig_config::{discover_config_path, load_for_workspace, ConfigError, SprigConfig};
use sprig_core::FileUri;
use sprig_index::ProjectRoot;

const CONFIG: &str = r#"
[logging]
level = "sprig.index=debug,info"
stderr = false

[indexing]
max_passes = 3
ignored_annotation_prefixes = ["java.", "kotlin."]
background_threads = 1

[[projects]]
name = "shop"
root = "services/shop"

[[projects]]
name = "remote"
root = "file:///srv/remote"
"#;

#[test]
fn configs_are_found_in_ancestor_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("services/shop/src");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(dir.path().join("sprig.toml"), CONFIG).unwrap();

    assert_eq!(
        discover_config_path(&nested),
        Some(dir.path().join("sprig.toml"))
    );

    let (config, base) = load_for_workspace(&nested).unwrap();
    assert_eq!(base, dir.path());
    assert_eq!(config.indexing.max_passes, 3);
    assert!(!config.logging.stderr);
}

#[test]
fn missing_configs_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    // Ancestors of a fresh temp dir are not expected to carry a sprig.toml.
    if discover_config_path(dir.path()).is_some() {
        return;
    }
    let (config, base) = load_for_workspace(dir.path()).unwrap();
    assert_eq!(config, SprigConfig::default());
    assert_eq!(base, dir.path());
}

#[test]
fn indexer_settings_follow_the_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("services/shop")).unwrap();
    let config = SprigConfig::from_toml_str(CONFIG).unwrap();

    let indexer = config.indexer_config(dir.path());
    assert_eq!(indexer.pipeline.max_passes, 3);
    assert_eq!(
        indexer.pipeline.ignored_annotation_prefixes,
        vec!["java.".to_string(), "kotlin.".to_string()]
    );
    assert_eq!(indexer.scheduler.background_threads, 1);
    assert_eq!(
        indexer.pipeline.projects,
        vec![
            ProjectRoot::new(
                "shop",
                FileUri::from_path(&dir.path().join("services/shop")).as_str()
            ),
            ProjectRoot::new("remote", "file:///srv/remote"),
        ]
    );
}

#[test]
fn unreadable_files_report_their_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = SprigConfig::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn type_errors_do_not_echo_the_source_line() {
    let err = SprigConfig::from_toml_str("[logging]\njson = \"yes\"\n").unwrap_err();
    let ConfigError::Toml(message) = err else {
        panic!("expected a toml error, got {err:?}");
    };
    assert!(!message.contains("json = "), "{message}");
}
