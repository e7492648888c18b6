use std::fs;
use std::path::Path;
use std::time::Duration;

use jmsit_config::{
    ConfigGuardRailError, ConfigLoadError, LoadContext, ShimRegistrySource,
    load,
};
use tempfile::TempDir;

const TWO_SHIMS: &str = r#"
timeout = "3s"

[[shim]]
name = "A"
sender = ["a-send"]
receiver = ["a-recv"]

[[shim]]
name = "B"
sender = ["b-send"]
receiver = ["b-recv"]
"#;

fn context(base: &Path) -> LoadContext {
    LoadContext {
        base_dir: base.to_path_buf(),
        ..LoadContext::default()
    }
}

fn names(load: &jmsit_config::ConfigLoad) -> Vec<String> {
    load.registry
        .shims
        .iter()
        .map(|shim| jmsit_core::ShimHandle::name(shim).to_string())
        .collect()
}

#[test]
fn cli_path_wins_over_everything_else() {
    let dir = TempDir::new().unwrap();
    let cli = dir.path().join("cli.toml");
    fs::write(&cli, TWO_SHIMS).unwrap();
    fs::write(
        dir.path().join("jmsit.toml"),
        "[[shim]]\nname = \"Other\"\nsender = [\"x\"]\nreceiver = [\"y\"]\n",
    )
    .unwrap();

    let ctx = LoadContext {
        cli_path: Some(cli.clone()),
        shims_json: Some("{}".into()),
        ..context(dir.path())
    };
    let loaded = load(&ctx).unwrap();

    assert_eq!(loaded.source, ShimRegistrySource::Cli(cli));
    assert_eq!(names(&loaded), ["A", "B"]);
    assert_eq!(loaded.registry.timeout, Duration::from_secs(3));
}

#[test]
fn env_path_accepts_json_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("registry.json");
    fs::write(
        &path,
        r#"{"shim": [{"name": "J", "sender": ["js"], "receiver": ["jr"]}]}"#,
    )
    .unwrap();

    let ctx = LoadContext {
        shims_path: Some(path.display().to_string()),
        ..context(dir.path())
    };
    let loaded = load(&ctx).unwrap();

    assert_eq!(loaded.source, ShimRegistrySource::EnvPath(path));
    assert_eq!(names(&loaded), ["J"]);
}

#[test]
fn inline_json_comes_before_default_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("jmsit.toml"), TWO_SHIMS).unwrap();

    let ctx = LoadContext {
        shims_json: Some(
            r#"{"timeout": "250ms", "shim": [{"name": "I", "sender": ["s"], "receiver": ["r"]}]}"#
                .into(),
        ),
        ..context(dir.path())
    };
    let loaded = load(&ctx).unwrap();

    assert_eq!(loaded.source, ShimRegistrySource::EnvInline);
    assert_eq!(loaded.registry.timeout, Duration::from_millis(250));
}

#[test]
fn default_file_is_found_under_config_dir() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("config")).unwrap();
    let path = dir.path().join("config").join("jmsit.toml");
    fs::write(&path, TWO_SHIMS).unwrap();

    let loaded = load(&context(dir.path())).unwrap();
    assert_eq!(loaded.source, ShimRegistrySource::File(path));
}

#[test]
fn test_home_supplies_builtin_shims() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("qit");
    fs::create_dir_all(home.join("shims").join("qpid-jms")).unwrap();
    fs::write(home.join("shims").join("qpid-jms").join("cp.txt"), "cp").unwrap();

    let ctx = LoadContext {
        test_home: Some(home.display().to_string()),
        ..context(dir.path())
    };
    let loaded = load(&ctx).unwrap();

    assert_eq!(loaded.source, ShimRegistrySource::TestHome(home));
    assert_eq!(names(&loaded), ["ProtonCpp", "ProtonPython", "QpidJms"]);
    assert_eq!(loaded.registry.timeout, Duration::from_secs(10));
}

#[test]
fn nothing_to_load_is_a_startup_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        load(&context(dir.path())),
        Err(ConfigLoadError::NotFound)
    ));
}

#[test]
fn broken_file_names_its_origin() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("jmsit.toml");
    fs::write(&path, "[[shim]\nname = ").unwrap();

    let err = load(&context(dir.path())).unwrap_err();
    let ConfigLoadError::Registry { origin, .. } = &err else {
        panic!("expected registry error, got {err:?}");
    };
    assert_eq!(origin, &path.display().to_string());
}

#[test]
fn guard_rails_run_on_load() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("jmsit.toml"),
        "[[shim]]\nname = \"A\"\nsender = [\"s\"]\nreceiver = [\"r\"]\n\
         [[shim]]\nname = \"A\"\nsender = [\"s\"]\nreceiver = [\"r\"]\n",
    )
    .unwrap();

    assert!(matches!(
        load(&context(dir.path())),
        Err(ConfigLoadError::GuardRail(
            ConfigGuardRailError::DuplicateShimName(_)
        ))
    ));
}
