// Command-line interface parsing for pulse.
// Resolves the backend address override and the initial timeline range and
// details date.

use chrono::NaiveDate;
use clap::Parser;
use thiserror::Error;

/// Error types for CLI argument validation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid day count {0}. Expected 1-365")]
    InvalidDays(u32),
}

/// pulse - terminal dashboard for product analytics
#[derive(Parser, Debug)]
#[command(name = "pulse")]
#[command(about = "Browse analytics metrics: overview, timelines, breakdowns, and LTV")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides the PULSE_API_URL environment variable)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Initial timeline range in days
    #[arg(long, value_name = "N", default_value_t = 30)]
    pub days: u32,

    /// Initial date for the Details tab (YYYY-MM-DD, defaults to yesterday)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,
}

/// Configuration derived from CLI arguments for application startup.
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub api_url: Option<String>,
    pub timeline_days: u32,
    pub details_date: Option<NaiveDate>,
}

impl StartupConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.days == 0 || cli.days > 365 {
            return Err(CliError::InvalidDays(cli.days));
        }

        let details_date = match &cli.date {
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| CliError::InvalidDate(raw.clone()))?,
            ),
            None => None,
        };

        Ok(StartupConfig {
            api_url: cli.api_url.clone(),
            timeline_days: cli.days,
            details_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("pulse").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = StartupConfig::from_cli(&parse(&[])).unwrap();
        assert_eq!(config.timeline_days, 30);
        assert!(config.api_url.is_none());
        assert!(config.details_date.is_none());
    }

    #[test]
    fn test_api_url_flag() {
        let cli = parse(&["--api-url", "http://example:9000"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://example:9000"));
    }

    #[test]
    fn test_valid_date() {
        let config = StartupConfig::from_cli(&parse(&["--date", "2024-06-01"])).unwrap();
        assert_eq!(
            config.details_date,
            Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        );
    }

    #[test]
    fn test_invalid_date_rejected() {
        let result = StartupConfig::from_cli(&parse(&["--date", "June 1st"]));
        assert!(matches!(result, Err(CliError::InvalidDate(_))));
    }

    #[test]
    fn test_days_bounds() {
        assert!(StartupConfig::from_cli(&parse(&["--days", "0"])).is_err());
        assert!(StartupConfig::from_cli(&parse(&["--days", "366"])).is_err());
        let config = StartupConfig::from_cli(&parse(&["--days", "7"])).unwrap();
        assert_eq!(config.timeline_days, 7);
    }
}
