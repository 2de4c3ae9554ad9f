//! Document store integration
//!
//! The [`StoreClient`] trait is the capability repositories consume;
//! [`StoreContext`] owns the database-level handle and [`CosmosStore`]
//! implements the capability against Azure Cosmos DB.

pub mod context;
pub mod cosmos;
pub mod traits;

pub use context::StoreContext;
pub use cosmos::CosmosStore;
pub use traits::{QueryPage, StoreClient};
