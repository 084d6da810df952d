use super::catalog_manager::CatalogManager;
use super::disable_state::DisableState;
use async_trait::async_trait;
use blocky_application::ports::{BlockFilterEnginePort, BlockMatch, BlockingStatus};
use blocky_domain::client_matcher::ClientMatcher;
use blocky_domain::group::{Group, DEFAULT_GROUP};
use blocky_domain::DomainError;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Concrete `BlockFilterEnginePort`: group resolution via `clientGroupsBlock`
/// matchers, allow-then-deny catalog lookups, and a shared disable-blocking
/// timer (§4.5, §4.6).
pub struct BlockFilterEngine {
    groups: Vec<Group>,
    matchers: Vec<(ClientMatcher, Vec<String>)>,
    catalogs: CatalogManager,
    disable_state: Arc<DisableState>,
}

impl BlockFilterEngine {
    pub fn new(groups: Vec<Group>, client_groups_block: &HashMap<String, Vec<String>>, catalogs: CatalogManager) -> Self {
        let matchers = client_groups_block
            .iter()
            .map(|(raw, target_groups)| (ClientMatcher::parse(raw), target_groups.clone()))
            .collect();
        Self { groups, matchers, catalogs, disable_state: Arc::new(DisableState::new()) }
    }
}

#[async_trait]
impl BlockFilterEnginePort for BlockFilterEngine {
    fn resolve_groups(&self, client_names: &[String], client_ip: IpAddr) -> Vec<String> {
        let mut groups: Vec<String> = self
            .matchers
            .iter()
            .filter(|(matcher, _)| matcher.matches(client_names, client_ip))
            .flat_map(|(_, groups)| groups.iter().cloned())
            .collect();
        groups.push(DEFAULT_GROUP.to_string());
        groups.dedup();
        groups
    }

    fn check(&self, domain: &str, groups: &[String]) -> BlockMatch {
        if !self.disable_state.blocking_active_for(groups) {
            return BlockMatch::NotMatched;
        }
        for group in groups {
            if let Some(allow) = self.catalogs.allow_catalog(group) {
                if allow.matches_chain(domain) {
                    return BlockMatch::Allowed;
                }
            }
        }
        for group in groups {
            if let Some(deny) = self.catalogs.deny_catalog(group) {
                if deny.matches_chain(domain) {
                    return BlockMatch::Denied { group: group.clone() };
                }
            }
        }
        BlockMatch::NotMatched
    }

    async fn reload(&self) -> Result<(), DomainError> {
        let deny = self.catalogs.refresh_all(&self.groups, "deny").await;
        let allow = self.catalogs.refresh_all(&self.groups, "allow").await;
        deny.and(allow)
    }

    async fn disable(&self, duration: Option<Duration>, groups: Vec<String>) {
        self.disable_state.disable(duration, groups);
    }

    async fn enable(&self) {
        self.disable_state.enable();
    }

    fn status(&self) -> BlockingStatus {
        self.disable_state.status()
    }
}
