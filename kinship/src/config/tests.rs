#[cfg(test)]
mod tests {
    use crate::config::{
        ConfigBuilder, ConfigError, ConfigLoader, DEFAULT_MAX_CONTEXT_LENGTH, KinshipConfig,
        LogFormat, LogLevel, validation,
    };
    use crate::storage::config::{StorageBackend, SurrealDBEngine};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = KinshipConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::SurrealDB);
        assert_eq!(config.storage.surrealdb.engine, SurrealDBEngine::RocksDB);
        assert_eq!(config.storage.surrealdb.namespace, "kinship");
        assert_eq!(config.friends.max_context_length, DEFAULT_MAX_CONTEXT_LENGTH);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_config_builder_with_surrealdb() {
        let config = ConfigBuilder::new()
            .with_data_dir("/tmp/test_data")
            .with_surrealdb_rocksdb("/tmp/test_data/db")
            .with_surrealdb_namespace("ns", "db")
            .with_log_level(LogLevel::Debug)
            .build()
            .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/test_data"));
        assert_eq!(config.storage.backend, StorageBackend::SurrealDB);
        assert_eq!(config.storage.surrealdb.connection, "/tmp/test_data/db");
        assert_eq!(config.storage.surrealdb.namespace, "ns");
        assert_eq!(config.storage.surrealdb.database, "db");
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_config_builder_with_memory() {
        let config = ConfigBuilder::new()
            .with_memory_storage()
            .with_max_context_length(64)
            .build()
            .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.friends.max_context_length, 64);
    }

    #[test]
    fn test_validation() {
        assert!(ConfigBuilder::new().build().is_ok());
        assert!(validation::validate_config(&KinshipConfig::default()).is_ok());

        let zero = ConfigBuilder::new().with_max_context_length(0).build();
        assert!(matches!(zero, Err(ConfigError::ValidationError(_))));

        let huge = ConfigBuilder::new().with_max_context_length(1_000_000).build();
        assert!(matches!(huge, Err(ConfigError::ValidationError(_))));

        let no_namespace = ConfigBuilder::new().with_surrealdb_namespace("", "main").build();
        assert!(matches!(no_namespace, Err(ConfigError::ValidationError(_))));

        // Memory backend ignores SurrealDB settings entirely
        let memory = ConfigBuilder::new()
            .with_surrealdb_namespace("", "")
            .with_memory_storage()
            .build();
        assert!(memory.is_ok());
    }

    #[test]
    fn test_predefined_configs() {
        let dev = ConfigBuilder::development().build().unwrap();
        let test = ConfigBuilder::testing().build().unwrap();
        let prod = ConfigBuilder::production().build().unwrap();

        assert_eq!(dev.storage.backend, StorageBackend::Memory);
        assert_eq!(dev.logging.level, LogLevel::Debug);

        assert_eq!(test.storage.surrealdb.engine, SurrealDBEngine::Memory);

        assert_eq!(prod.storage.surrealdb.engine, SurrealDBEngine::RocksDB);
        assert_eq!(prod.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_reads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[storage]
backend = "memory"

[friends]
max_context_length = 256

[logging]
level = "warn"
format = "compact"
"#
        )
        .unwrap();

        let config = ConfigLoader::new()
            .load_file(file.path())
            .unwrap()
            .extract()
            .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.friends.max_context_length, 256);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_loader_rejects_missing_and_unknown_files() {
        let missing = ConfigLoader::new().load_file("/definitely/not/here.toml").map(|_| ());
        assert!(matches!(missing, Err(ConfigError::FileLoadError(_))));

        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let unsupported = ConfigLoader::new().load_file(file.path()).map(|_| ());
        assert!(matches!(unsupported, Err(ConfigError::FileLoadError(_))));
    }

    #[test]
    fn test_loader_validates_extracted_config() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"friends": {{"max_context_length": 0}}}}"#).unwrap();

        let result = ConfigLoader::new().load_file(file.path()).unwrap().extract();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = ConfigBuilder::new()
            .with_data_dir("/tmp/test_data")
            .with_max_context_length(42)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: KinshipConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.storage.data_dir, deserialized.storage.data_dir);
        assert_eq!(deserialized.friends.max_context_length, 42);
    }
}
