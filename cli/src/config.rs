use std::env;
use std::path::PathBuf;
use tracing::info;

pub const SEED_VAR: &str = "DOCSTORE_SEED";

/// Runtime settings for the driver, read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// JSON array of documents saved before stdin is read.
    pub seed_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed_path = match lookup(SEED_VAR) {
            Some(path) if !path.trim().is_empty() => {
                info!("Seeding documents from '{}' ({}).", path, SEED_VAR);
                Some(PathBuf::from(path))
            }
            _ => None,
        };

        Self { seed_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn reads_seed_path() {
        let config = config_from(&[(SEED_VAR, "/tmp/docs.json")]);
        assert_eq!(config.seed_path, Some(PathBuf::from("/tmp/docs.json")));
    }

    #[test]
    fn blank_seed_path_is_ignored() {
        assert_eq!(config_from(&[(SEED_VAR, "  ")]).seed_path, None);
    }
}
