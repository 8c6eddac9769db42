pub mod factory;
pub mod repository;

pub use factory::{DbConfig, StoreFactory, StoreRegistry};
pub use repository::{SessionStore, StoreError};
