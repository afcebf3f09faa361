//! crates/tradevision_core/src/route.rs
//!
//! The navigable locations of the client and their URL paths.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Pricing,
    /// `from` is the path to return to after a successful login.
    Login {
        from: Option<String>,
        selected_plan: Option<i64>,
    },
    Signup,
    Dashboard,
    Analysis,
    Techniques,
    Learning,
    ModuleContents(i64),
    ContentViewer(i64),
    Profile,
}

impl Route {
    /// The bare login route, with no return location.
    pub fn login() -> Self {
        Route::Login {
            from: None,
            selected_plan: None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Pricing => "/pricing".to_string(),
            Route::Login { .. } => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Analysis => "/analysis".to_string(),
            Route::Techniques => "/techniques".to_string(),
            Route::Learning => "/learning".to_string(),
            Route::ModuleContents(id) => format!("/learning/modules/{}", id),
            Route::ContentViewer(id) => format!("/learning/contents/{}", id),
            Route::Profile => "/profile".to_string(),
        }
    }

    /// Parses a path produced by [`Route::path`]. Unknown paths yield `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Landing),
            ["pricing"] => Some(Route::Pricing),
            ["login"] => Some(Route::login()),
            ["signup"] => Some(Route::Signup),
            ["dashboard"] => Some(Route::Dashboard),
            ["analysis"] => Some(Route::Analysis),
            ["techniques"] => Some(Route::Techniques),
            ["learning"] => Some(Route::Learning),
            ["learning", "modules", id] => id.parse().ok().map(Route::ModuleContents),
            ["learning", "contents", id] => id.parse().ok().map(Route::ContentViewer),
            ["profile"] => Some(Route::Profile),
            _ => None,
        }
    }

    /// Protected routes require an authenticated session.
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            Route::Landing | Route::Pricing | Route::Login { .. } | Route::Signup
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
