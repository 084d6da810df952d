//! Application layer: ports (traits) implemented by `blocky-infrastructure`
//! and consumed by the resolver chain. No concrete implementations live
//! here — only the seams the core is built around.

pub mod ports;
