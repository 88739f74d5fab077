//! # Stanza Shared
//!
//! Types shared across the API surface: write DTOs with their declarative
//! validation, the two read projections of a post, and the error/pagination
//! envelopes.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, Page, Violation};
