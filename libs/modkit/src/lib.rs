//! # ModKit - shared building blocks for REST modules
//!
//! - [`api::problem`]: uniform JSON error body and its axum response wrapper
//! - [`api::route_table`]: ordered route registration (literal segments before parameters)
//! - [`api::pagination`]: lenient `page`/`limit` query parsing with bounds
//! - [`contracts`]: the trait a module implements to be mounted by the HTTP host

pub use anyhow::Result;

pub mod api;
pub mod contracts;

pub use api::pagination::{PagePolicy, PageQuery, PageRequest};
pub use api::problem::{not_found, Problem, ProblemResponse};
pub use api::route_table::{RouteError, RouteTable};
pub use contracts::RestfulModule;
