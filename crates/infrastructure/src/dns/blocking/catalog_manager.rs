use crate::dns::catalog::{DomainCatalog, DomainCatalogBuilder};
use crate::dns::list::parse_list_text;
use arc_swap::ArcSwap;
use blocky_application::ports::{Event, EventSink, ListSourceLoader};
use blocky_domain::group::Group;
use blocky_domain::list_source::ListSourceDescriptor;
use blocky_domain::DomainError;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Holds the live deny/allow catalogs per group and knows how to recompile
/// them from their configured sources (§4.5). Catalogs are swapped in
/// atomically; readers never block on a refresh in progress.
pub struct CatalogManager {
    deny: HashMap<String, ArcSwap<DomainCatalog>>,
    allow: HashMap<String, ArcSwap<DomainCatalog>>,
    loader: Arc<dyn ListSourceLoader>,
    events: Arc<dyn EventSink>,
    max_errors_per_source: u32,
}

impl CatalogManager {
    pub fn new(groups: &[Group], loader: Arc<dyn ListSourceLoader>, events: Arc<dyn EventSink>, max_errors_per_source: u32) -> Self {
        let mut deny = HashMap::new();
        let mut allow = HashMap::new();
        for group in groups {
            deny.insert(group.name.clone(), ArcSwap::from_pointee(DomainCatalog::empty()));
            allow.insert(group.name.clone(), ArcSwap::from_pointee(DomainCatalog::empty()));
        }
        Self { deny, allow, loader, events, max_errors_per_source }
    }

    pub fn deny_catalog(&self, group: &str) -> Option<Arc<DomainCatalog>> {
        self.deny.get(group).map(|c| c.load_full())
    }

    pub fn allow_catalog(&self, group: &str) -> Option<Arc<DomainCatalog>> {
        self.allow.get(group).map(|c| c.load_full())
    }

    async fn build_catalog(&self, sources: &[ListSourceDescriptor]) -> Result<DomainCatalog, DomainError> {
        let fetches = sources.iter().map(|source| async move {
            let text = self.loader.load(source).await?;
            parse_list_text(&text, self.max_errors_per_source).map_err(DomainError::Parse)
        });
        let results = join_all(fetches).await;

        let mut builder = DomainCatalogBuilder::new();
        for result in results {
            let (tokens, _errors) = result?;
            for token in tokens {
                builder.insert(token);
            }
        }
        Ok(builder.build())
    }

    /// Recompiles every group's deny and allow catalogs and swaps them in.
    /// A transient or permanent failure on any source of a group leaves
    /// that group's previous catalogs untouched; other groups still
    /// refresh (§4.5).
    pub async fn refresh_all(&self, groups: &[Group], list_type: &'static str) -> Result<(), DomainError> {
        let mut any_failed = false;
        for group in groups {
            let (sources, target) = match list_type {
                "deny" => (&group.deny_sources, &self.deny),
                _ => (&group.allow_sources, &self.allow),
            };
            let Some(slot) = target.get(&group.name) else { continue };

            match self.build_catalog(sources).await {
                Ok(catalog) => {
                    let entry_count = catalog.len();
                    slot.store(Arc::new(catalog));
                    self.events.emit(Event::GroupChanged { list_type, group: group.name.clone(), entry_count });
                    info!(group = %group.name, list_type, entry_count, "catalog refreshed");
                }
                Err(e) => {
                    any_failed = true;
                    warn!(group = %group.name, list_type, error = %e, "catalog refresh failed, keeping previous catalog");
                }
            }
        }
        if any_failed {
            return Err(DomainError::Internal("one or more groups failed to refresh".to_string()));
        }
        Ok(())
    }
}
