use actas_shared::const_config::client::CLIENT_DEFAULT_BASE_URL;
use std::{
    convert::{TryFrom, TryInto},
    path::{Path, PathBuf},
};

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Configuration {
    /// Selects the backend host
    pub base_url: String,
    /// Where the session is persisted between runs
    pub storage_path: PathBuf,
}

pub fn get_configuration() -> Result<Configuration, config::ConfigError> {
    let base_path = std::env::current_dir().expect("failed to determine the current directory");
    get_configuration_from(&base_path.join("configuration"))
}

/// Both files are optional so the tool also runs from outside the repository
pub fn get_configuration_from(
    configuration_directory: &Path,
) -> Result<Configuration, config::ConfigError> {
    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .set_default("base_url", CLIENT_DEFAULT_BASE_URL)?
        .set_default("storage_path", "actas_session.json")?
        .add_source(config::File::from(configuration_directory.join("base.toml")).required(false))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_BASE_URL=https://example.com` would set `Configuration.base_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Configuration>()
}

/// The possible runtime environment for our application.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::lower("local", "local")]
    #[case::mixed_case("Production", "production")]
    fn environment_names(#[case] input: &str, #[case] expected: &str) {
        let environment = Environment::try_from(input.to_string()).unwrap();
        assert_eq!(environment.as_str(), expected);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!(Environment::try_from("staging".to_string()).is_err());
    }

    #[test]
    fn repository_configuration_is_valid() {
        let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("configuration");
        let configuration = get_configuration_from(&directory).unwrap();
        assert!(configuration.base_url.starts_with("http"));
        assert_eq!(configuration.storage_path, Path::new("actas_session.json"));
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let configuration = get_configuration_from(Path::new("does/not/exist")).unwrap();
        assert!(configuration.base_url.starts_with("http"));
    }
}
