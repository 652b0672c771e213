//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate scoping, policy and repository calls into use-case APIs.
//! - Take the acting user as an explicit argument on every call.
//!
//! # Invariants
//! - Every check (existence, membership, validation) precedes the write.
//! - Services return `BlackBookError` only; storage errors are folded in.

pub mod image_service;
pub mod named_service;
pub mod relationship_service;
pub mod universe_service;
pub mod user_service;
