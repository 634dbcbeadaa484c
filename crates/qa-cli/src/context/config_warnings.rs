use qa_config::QaConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &QaConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &QaConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    let database_is_default =
        !config.database.has_any_networked_setting() && config.database.url.is_empty();
    if database_is_default && has_single_underscore_key(&env_keys, "QALAB_DATABASE") {
        warnings.push(
            "Database config appears default while QALAB_DATABASE* env vars exist. Use double underscores (example: QALAB_DATABASE__URL)."
                .to_string(),
        );
    }

    if has_single_underscore_key(&env_keys, "QALAB_BACKUP") {
        warnings.push(
            "QALAB_BACKUP* env vars with a single underscore are ignored. Use double underscores (example: QALAB_BACKUP__OUTPUT_DIR)."
                .to_string(),
        );
    }

    warnings
}

/// A key under `prefix` that is not `prefix__...`, so figment never maps it.
fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    let nested = format!("{prefix}__");
    keys.iter()
        .any(|key| key.starts_with(prefix) && !key.starts_with(&nested))
}
