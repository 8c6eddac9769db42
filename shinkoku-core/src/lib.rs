pub mod calculations;
pub mod db;
pub mod models;
pub mod report;
pub mod session;
pub mod visual;

pub use calculations::{ComputationResult, recompute};
pub use db::{DbConfig, SessionStore, StoreError, StoreFactory, StoreRegistry};
pub use models::*;
pub use report::to_report_text;
pub use session::Session;
pub use visual::{VisualParams, to_visual_params};
