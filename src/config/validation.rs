use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::crawler::{MAX_DEPTH_LIMIT, MAX_URLS_LIMIT};
use crate::ConfigError;
use url::Url;

/// Longest politeness delay accepted (one minute)
const MAX_POLITENESS_DELAY_MS: u64 = 60_000;

/// Longest request timeout accepted (five minutes)
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.default_max_urls < 1 || config.default_max_urls > MAX_URLS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "default_max_urls must be between 1 and {}, got {}",
            MAX_URLS_LIMIT, config.default_max_urls
        )));
    }

    if config.default_max_depth < 1 || config.default_max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "default_max_depth must be between 1 and {}, got {}",
            MAX_DEPTH_LIMIT, config.default_max_depth
        )));
    }

    if config.politeness_delay_ms > MAX_POLITENESS_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "politeness_delay_ms must be <= {}ms, got {}ms",
            MAX_POLITENESS_DELAY_MS, config.politeness_delay_ms
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and {}, got {}",
            MAX_REQUEST_TIMEOUT_SECS, config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // The crawler name doubles as the robots.txt product token, which only
    // allows letters, digits, '-' and '_'
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only letters, digits, '-' and '_', got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.export_dir.is_empty() {
        return Err(ConfigError::Validation(
            "export_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_max_urls_bounds() {
        let mut config = Config::default();
        config.crawler.default_max_urls = 0;
        assert!(validate(&config).is_err());

        config.crawler.default_max_urls = 201;
        assert!(validate(&config).is_err());

        config.crawler.default_max_urls = 200;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_max_depth_bounds() {
        let mut config = Config::default();
        config.crawler.default_max_depth = 0;
        assert!(validate(&config).is_err());

        config.crawler.default_max_depth = 6;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_politeness_delay_allowed() {
        let mut config = Config::default();
        config.crawler.politeness_delay_ms = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_crawler_name_rejects_spaces() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "Seo Sweep".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_contact_url() {
        let mut config = Config::default();
        config.user_agent.contact_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }
}
