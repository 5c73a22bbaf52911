pub mod config;
pub mod error;
pub mod fqdn;
pub mod provider;
