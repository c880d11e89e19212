//! Modelgate Routing
//!
//! This crate provides the provider registry and request dispatcher: given a
//! request carrying a provider identifier, it selects the matching adapter and
//! forwards the call.

pub mod registry;

pub use registry::ProviderRegistry;
