mod map;

pub use map::{HostsEntry, HostsMap};
