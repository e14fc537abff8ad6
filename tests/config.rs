#[cfg(test)]
mod tests {
    use kanbo::libs::config::{Config, StoreConfig, CONFIG_FILE_NAME};
    use kanbo::libs::data_storage::{DataStorage, DATA_DIR_ENV};
    use kanbo::libs::seed::Seed;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Points the data directory at a fresh temporary directory.
    struct ConfigTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::with_base(temp_dir.path().join("kanbo"));
            ConfigTestContext { _temp_dir: temp_dir, storage }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_default_config(_ctx: &mut ConfigTestContext) {
        let config = Config::default();
        assert!(config.store.is_none());

        let store = config.store();
        assert_eq!(store.snapshot_file, PathBuf::from("database.json"));
        assert_eq!(store.save_interval, 60);
        assert_eq!(store.seed, Seed::Sample);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(ctx: &mut ConfigTestContext) {
        let config = Config {
            store: Some(StoreConfig {
                snapshot_file: PathBuf::from("boards/main.json"),
                save_interval: 15,
                seed: Seed::Empty,
            }),
        };

        config.save_to(&ctx.storage).unwrap();
        let read = Config::read_from(&ctx.storage).unwrap();

        assert_eq!(read, config);
        assert!(ctx.storage.base_path().join(CONFIG_FILE_NAME).exists());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_store_section_uses_defaults(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(&path, r#"{"store": {"seed": "empty"}}"#).unwrap();

        let store = Config::read_from(&ctx.storage).unwrap().store();

        assert_eq!(store.seed, Seed::Empty);
        assert_eq!(store.save_interval, 60);
        assert_eq!(store.snapshot_file, PathBuf::from("database.json"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_invalid_config_is_an_error(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(&path, "{ broken").unwrap();

        let err = Config::read_from(&ctx.storage).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration file"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_snapshot_path_resolution(ctx: &mut ConfigTestContext) {
        let relative = StoreConfig::default();
        assert_eq!(
            relative.snapshot_path(&ctx.storage).unwrap(),
            ctx.storage.base_path().join("database.json")
        );

        let absolute_file = ctx.storage.base_path().join("elsewhere").join("board.json");
        let absolute = StoreConfig {
            snapshot_file: absolute_file.clone(),
            ..StoreConfig::default()
        };
        assert_eq!(absolute.snapshot_path(&ctx.storage).unwrap(), absolute_file);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_period_has_a_floor(_ctx: &mut ConfigTestContext) {
        let config = StoreConfig {
            save_interval: 0,
            ..StoreConfig::default()
        };
        assert_eq!(config.save_period(), Duration::from_secs(1));
        assert_eq!(StoreConfig::default().save_period(), Duration::from_secs(60));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_open_store_uses_configured_seed_and_file(ctx: &mut ConfigTestContext) {
        let config = StoreConfig {
            seed: Seed::Empty,
            ..StoreConfig::default()
        };

        let store = config.open_store(&ctx.storage).unwrap();
        store.add("a", "", "todo");
        store.save().unwrap();

        assert!(ctx.storage.base_path().join("database.json").exists());
        let reopened = config.open_store(&ctx.storage).unwrap();
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_data_dir_env_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::env::set_var(DATA_DIR_ENV, temp_dir.path());

        let storage = DataStorage::new();

        std::env::remove_var(DATA_DIR_ENV);
        assert_eq!(storage.base_path(), temp_dir.path());
    }
}
