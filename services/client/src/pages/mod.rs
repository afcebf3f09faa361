//! services/client/src/pages/mod.rs
//!
//! View controllers. Each page owns its local state and a `PageScope`; all
//! network access goes through the domain API ports.

pub mod analysis;
pub mod auth;
pub mod dashboard;
pub mod learning;
pub mod pricing;
pub mod profile;
pub mod state;
pub mod techniques;

pub use analysis::{AnalysisPage, AnalysisStage, SelectedFile};
pub use auth::{LoginPage, SignupPage};
pub use dashboard::{DashboardData, DashboardPage};
pub use learning::{ContentViewerPage, LearningModulesPage, ModuleContentsPage, ModuleView};
pub use pricing::PricingPage;
pub use profile::{ProfileData, ProfilePage};
pub use state::{LoadState, PageScope};
pub use techniques::TechniquesPage;
