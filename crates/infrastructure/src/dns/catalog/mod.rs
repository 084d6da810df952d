mod domain_catalog;
mod regex_catalog;
mod string_catalog;

pub use domain_catalog::{DomainCatalog, DomainCatalogBuilder, ListToken};
pub use regex_catalog::{RegexCatalog, RegexCatalogBuilder};
pub use string_catalog::{StringCatalog, StringCatalogBuilder};
