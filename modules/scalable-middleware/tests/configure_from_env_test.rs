//! Slice key paths taken from `SCALABLE_*` environment variables.
//!
//! The environment is process-wide, so everything that touches it lives in a
//! single test.

use scalable_common::config::{
    parse_config, Config, ENTITY_KEY_PATH_VAR, INJECT_KEY_PATH_VAR, LOADING_KEY_PATH_VAR,
};
use scalable_middleware::{apply_key_paths, LoadingTracker};
use scalable_state::{entity, inject, KeyPath};

#[test]
fn environment_overrides_mount_every_slice() {
    std::env::set_var(INJECT_KEY_PATH_VAR, "app.inject");
    std::env::set_var(ENTITY_KEY_PATH_VAR, "app.entity");
    std::env::remove_var(LOADING_KEY_PATH_VAR);

    let config = Config::from_env();
    let (inject, entity, loading) = (inject(), entity(), LoadingTracker::new());
    apply_key_paths(&config, &inject, &entity, &loading);

    assert_eq!(inject.key_path(), KeyPath::from(["app", "inject"]));
    assert_eq!(entity.key_path(), KeyPath::from(["app", "entity"]));
    assert!(loading.key_path().is_root());

    // variables win over the file, unset ones keep the file's value
    let from_file = parse_config(
        r#"
[key_paths]
inject = "file.inject"
loading = "file.loading"
"#,
    )
    .unwrap();
    let config = from_file.with_env_overrides();
    apply_key_paths(&config, &inject, &entity, &loading);

    assert_eq!(inject.key_path(), KeyPath::from(["app", "inject"]));
    assert_eq!(entity.key_path(), KeyPath::from(["app", "entity"]));
    assert_eq!(loading.key_path(), KeyPath::from(["file", "loading"]));

    std::env::remove_var(INJECT_KEY_PATH_VAR);
    std::env::remove_var(ENTITY_KEY_PATH_VAR);
}
