use crate::list_source::ListSourceDescriptor;
use crate::upstream::Upstream;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GROUP: &str = "default";

/// A named set of upstreams (for dispatch) and/or named set of list sources
/// (for blocking). The special group `default` applies when no client
/// matches any configured membership rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub upstreams: Vec<Upstream>,
    #[serde(default)]
    pub deny_sources: Vec<ListSourceDescriptor>,
    #[serde(default)]
    pub allow_sources: Vec<ListSourceDescriptor>,
}

impl Group {
    pub fn default_group() -> Self {
        Self {
            name: DEFAULT_GROUP.to_string(),
            upstreams: Vec::new(),
            deny_sources: Vec::new(),
            allow_sources: Vec::new(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_GROUP
    }

    pub fn validate_name(name: &str) -> Result<(), String> {
        if name.is_empty() {
            return Err("group name cannot be empty".to_string());
        }
        if name.len() > 100 {
            return Err("group name cannot exceed 100 characters".to_string());
        }
        let valid = name
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');
        if !valid {
            return Err(
                "group name can only contain alphanumeric characters, spaces, hyphens, and underscores"
                    .to_string(),
            );
        }
        Ok(())
    }
}
