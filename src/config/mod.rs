//! Configuration module for SEO Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use seo_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("seo-sweep.toml")).unwrap();
//! println!("Politeness delay: {}ms", config.crawler.politeness_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, default_config_with_hash, hash_content, load_config,
    load_config_with_hash, parse_config,
};
