pub mod cloudflare;

use std::fmt;

use serde::Serialize;

/// Record types this tool can write. Only A records are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum RecordType {
    #[serde(rename = "A")]
    #[value(name = "A")]
    A,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    Updated,
    Created,
}

#[derive(Debug)]
pub struct DnsUpdateResult {
    pub action: UpdateAction,
    pub name: String,
    pub content: String,
    pub record_id: Option<String>,
}

impl DnsUpdateResult {
    pub fn message(&self) -> String {
        match self.action {
            UpdateAction::Updated => format!("Updated {} to {}", self.name, self.content),
            UpdateAction::Created => format!("Created {} with {}", self.name, self.content),
        }
    }
}
