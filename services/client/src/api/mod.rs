//! services/client/src/api/mod.rs
//!
//! One module per backend area, each a flat mapping of one function per REST
//! operation onto the shared `ApiClient`. None of them catch errors or cache.

pub mod auth;
pub mod charts;
pub mod learning;
pub mod subscription;
pub mod techniques;

pub use auth::AuthApi;
pub use charts::ChartsApi;
pub use learning::LearningApi;
pub use subscription::SubscriptionApi;
pub use techniques::TechniquesApi;
