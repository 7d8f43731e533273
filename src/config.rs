// Settings are read from an optional file and then from VOCABCLAD_* environment
// variables, the latter taking precedence, e.g. VOCABCLAD_TICKS_PER_SECOND=25.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::construct::{NO_USER, UserId};
use crate::datatype::{DEFAULT_TPS, MAX_TPS, MIN_TPS};
use crate::error::{Result, VocabError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ticks_per_second: u32,
    pub users: Vec<UserId>,
    pub current_user: UserId,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TPS,
            users: Vec::new(),
            current_user: NO_USER,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("VOCABCLAD")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("users"),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
    pub fn validate(&self) -> Result<()> {
        if !(MIN_TPS..=MAX_TPS).contains(&self.ticks_per_second) {
            return Err(VocabError::Config(format!(
                "ticks_per_second must be within {}..={}, got {}",
                MIN_TPS, MAX_TPS, self.ticks_per_second
            )));
        }
        if self.current_user != NO_USER && !self.users.contains(&self.current_user) {
            return Err(VocabError::Config(format!(
                "current_user {} is not among the registered users",
                self.current_user
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.ticks_per_second, 60);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_bad_settings() {
        let mut settings = Settings {
            ticks_per_second: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(VocabError::Config(_))));
        settings.ticks_per_second = 25;
        settings.current_user = 4;
        assert!(settings.validate().is_err());
        settings.users.push(4);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load("does/not/exist/vocabclad").unwrap();
        assert_eq!(settings.log_filter, "info");
    }
}
