//! Concrete implementations of the `blocky-application` ports: DNS wire
//! codec, transports, catalogs, caching, dispatch, and the resolver chain
//! that composes them (§4, §6).

pub mod dns;
