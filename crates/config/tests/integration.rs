//! Integration tests for config

#[cfg(test)]
mod tests {
    use sigdown_config::*;
    use std::io::Write;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        std::env::remove_var("SIGDOWN_MAX_BYTES");
        std::env::remove_var("SIGDOWN_TIMEOUT_SECS");
        std::env::remove_var("SIGDOWN_USER_AGENT");
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[download]
max_bytes = 4096
timeout_secs = 5

[network]
connect_timeout_secs = 3
user_agent = "release-fetcher/2"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.download.max_bytes(), 4096);
        assert_eq!(config.download.timeout(), Duration::from_secs(5));
        assert_eq!(config.network.connect_timeout_secs, 3);
        assert_eq!(config.network.user_agent, "release-fetcher/2");
        assert_eq!(config.network.pool_max_idle_per_host, 10);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(&dir.path().join("absent.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            sigdown_errors::Error::Config(sigdown_errors::ConfigError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_toml_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[download]\nmax_bytes = \"lots\"").unwrap();

        let err = Config::load_or_default(Some(temp_file.path()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            sigdown_errors::Error::Config(sigdown_errors::ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("SIGDOWN_MAX_BYTES", "100");
        std::env::set_var("SIGDOWN_TIMEOUT_SECS", "2");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.download.max_bytes(), 100);
        assert_eq!(config.download.timeout(), Duration::from_secs(2));

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("SIGDOWN_MAX_BYTES", "a lot");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(result.is_err());

        clear_env();
    }
}
