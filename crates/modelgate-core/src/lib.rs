//! Modelgate Core Types and Traits
//!
//! This crate provides the fundamental types used throughout Modelgate:
//! - Canonical request/response schemas for chat, embeddings and images
//! - Provider identifier and capability trait abstractions
//! - Core error types

pub mod chat;
pub mod embeddings;
pub mod error;
pub mod images;
pub mod provider;
pub mod synthetic;

pub use error::{Error, Result};
pub use provider::{Capability, LlmProvider, ProviderCapabilities, ProviderId};
