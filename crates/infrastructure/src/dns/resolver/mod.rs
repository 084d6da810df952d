mod chain;
pub mod stages;

pub use chain::{build, ChainDeps};
