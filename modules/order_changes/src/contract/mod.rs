pub mod client;
pub mod error;
pub mod model;

pub use client::OrderChangesApi;
pub use error::OrderChangesError;
pub use model::{
    NewOrderChange, OrderChange, OrderChangeDetails, OrderChangePatch, OrderSummary, Reference,
    UserSummary,
};
