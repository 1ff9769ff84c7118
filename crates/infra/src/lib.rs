//! Infrastructure layer: master-data stores, session storage, seeding.

pub mod read_model;
pub mod seed;

pub use seed::{MasterData, MasterDataStores, SeedError};
