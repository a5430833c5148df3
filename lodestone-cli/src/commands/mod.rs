//! Subcommand implementations

pub mod check;
pub mod serve;

use clap::Args;

use crate::settings::Settings;

/// Database flags shared by commands that connect
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Database URL (overrides DATABASE_URL and DB_* settings)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Maximum pooled connections (overrides DB_MAX_CONNECTIONS)
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Log every executed statement (overrides DB_ECHO)
    #[arg(long)]
    pub echo: bool,
}

impl DatabaseArgs {
    /// Apply command-line overrides on top of environment settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.database_url {
            settings.database_url = Some(url.clone());
        }
        if let Some(max) = self.max_connections {
            settings.db_max_connections = max;
        }
        if self.echo {
            settings.db_echo = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_environment() {
        let mut settings = Settings::from_vars(vec![
            ("DATABASE_URL".to_string(), "postgres://env/app".to_string()),
            ("DB_MAX_CONNECTIONS".to_string(), "10".to_string()),
        ])
        .unwrap();

        DatabaseArgs {
            database_url: Some("postgres://flag/app".into()),
            max_connections: Some(2),
            echo: true,
        }
        .apply(&mut settings);

        assert_eq!(settings.database_url().unwrap(), "postgres://flag/app");
        assert_eq!(settings.db_max_connections, 2);
        assert!(settings.db_echo);
    }

    #[test]
    fn absent_flags_keep_environment() {
        let mut settings = Settings::from_vars(vec![(
            "DATABASE_URL".to_string(),
            "postgres://env/app".to_string(),
        )])
        .unwrap();

        DatabaseArgs::default().apply(&mut settings);

        assert_eq!(settings.database_url().unwrap(), "postgres://env/app");
        assert!(!settings.db_echo);
    }
}
