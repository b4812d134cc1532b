// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::DbSettings;

/// Loads the database settings from the process environment.
///
/// This function is the primary entry point for this crate. It reads `HOST`,
/// `DATABASE_NAME`, `USER` and `PASSWORD` (the retry knobs `MAX_RETRIES` and
/// `RETRY_DELAY_SECS` are optional), deserializes them into our strongly-typed
/// `DbSettings` struct, and returns it.
pub fn load_settings() -> Result<DbSettings, ConfigError> {
    let builder = config::Config::builder()
        // Every key is sourced from the environment; `.env` loading is the
        // caller's concern so settings are never re-read as ambient state.
        .add_source(config::Environment::default())
        .build()?;

    let settings = builder.try_deserialize::<DbSettings>()?;

    if settings.max_retries == 0 {
        return Err(ConfigError::ValidationError(
            "MAX_RETRIES must be at least 1".to_string(),
        ));
    }

    Ok(settings)
}
