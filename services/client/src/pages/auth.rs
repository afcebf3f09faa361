//! services/client/src/pages/auth.rs
//!
//! The login and signup forms. Both validate locally before touching the
//! network and hand the actual authentication to the `SessionStore`.

use std::sync::Arc;
use tracing::debug;
use tradevision_core::domain::{Difficulty, LoginRequest, SignupRequest};
use tradevision_core::ports::Navigator;
use tradevision_core::route::Route;
use tradevision_core::validation::{validate_login, validate_signup, FieldErrors};

use crate::error::ClientError;
use crate::session::SessionStore;

/// Sends an already authenticated visitor to the dashboard. Returns whether it did.
fn bounce_if_authenticated(store: &SessionStore, navigator: &dyn Navigator) -> bool {
    if store.is_authenticated() {
        navigator.navigate(Route::Dashboard);
        return true;
    }
    false
}

//=========================================================================================
// Login
//=========================================================================================

pub struct LoginPage {
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    pub form: LoginRequest,
    errors: FieldErrors,
    from: Option<String>,
    selected_plan: Option<i64>,
}

impl LoginPage {
    /// `entered_via` is the route that opened the page; a `Login` route carries
    /// the return location and any plan chosen on the pricing page.
    pub fn new(store: Arc<SessionStore>, navigator: Arc<dyn Navigator>, entered_via: &Route) -> Self {
        let (from, selected_plan) = match entered_via {
            Route::Login {
                from,
                selected_plan,
            } => (from.clone(), *selected_plan),
            _ => (None, None),
        };
        Self {
            store,
            navigator,
            form: LoginRequest {
                email: String::new(),
                password: String::new(),
            },
            errors: FieldErrors::default(),
            from,
            selected_plan,
        }
    }

    pub fn on_enter(&self) -> bool {
        bounce_if_authenticated(&self.store, self.navigator.as_ref())
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn selected_plan(&self) -> Option<i64> {
        self.selected_plan
    }

    /// Where a successful login leads: the preserved location, else the dashboard.
    pub fn return_target(&self) -> Route {
        self.from
            .as_deref()
            .and_then(Route::from_path)
            .unwrap_or(Route::Dashboard)
    }

    pub async fn submit(&mut self) -> Result<(), ClientError> {
        // 1. Local validation; nothing is sent while errors remain.
        self.errors = validate_login(&self.form);
        if !self.errors.is_empty() {
            debug!("Login form rejected locally");
            return Err(ClientError::Validation(self.errors.clone()));
        }

        // 2. Authenticate. The store reports the outcome to the user.
        self.store.login(&self.form).await?;

        // 3. Leave the page.
        self.navigator.navigate(self.return_target());
        Ok(())
    }
}

//=========================================================================================
// Signup
//=========================================================================================

pub struct SignupPage {
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    pub form: SignupRequest,
    pub confirm_password: String,
    errors: FieldErrors,
}

impl SignupPage {
    pub fn new(store: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            form: SignupRequest {
                email: String::new(),
                password: String::new(),
                nickname: String::new(),
                investment_level: Some(Difficulty::Beginner),
            },
            confirm_password: String::new(),
            errors: FieldErrors::default(),
        }
    }

    pub fn on_enter(&self) -> bool {
        bounce_if_authenticated(&self.store, self.navigator.as_ref())
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub async fn submit(&mut self) -> Result<(), ClientError> {
        self.errors = validate_signup(&self.form, &self.confirm_password);
        if !self.errors.is_empty() {
            debug!("Signup form rejected locally");
            return Err(ClientError::Validation(self.errors.clone()));
        }

        self.store.signup(&self.form).await?;
        self.navigator.navigate(Route::Dashboard);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;
    use crate::session::SessionCell;
    use crate::testing::{FakeAuth, RecordingNavigator, RecordingNotifier};
    use tradevision_core::validation::Field;

    struct Harness {
        auth: Arc<FakeAuth>,
        store: Arc<SessionStore>,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness() -> Harness {
        let auth = Arc::new(FakeAuth::returning_token("tok123"));
        let store = Arc::new(SessionStore::new(
            SessionCell::new(),
            auth.clone(),
            Arc::new(MemoryStorage::new()),
            Arc::new(RecordingNotifier::default()),
        ));
        store.init();
        Harness {
            auth,
            store,
            navigator: Arc::new(RecordingNavigator::default()),
        }
    }

    #[tokio::test]
    async fn invalid_login_sends_nothing() {
        let h = harness();
        let mut page = LoginPage::new(h.store.clone(), h.navigator.clone(), &Route::login());
        page.form.email = "not-an-email".into();

        let err = page.submit().await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(
            page.errors().get(Field::Email),
            Some("Please enter a valid email address.")
        );
        assert_eq!(page.errors().get(Field::Password), Some("Please enter your password."));
        assert!(h.auth.calls().is_empty());
        assert!(h.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn login_returns_to_the_preserved_location() {
        let h = harness();
        let entered = Route::Login {
            from: Some("/techniques".into()),
            selected_plan: None,
        };
        let mut page = LoginPage::new(h.store.clone(), h.navigator.clone(), &entered);
        page.form.email = "user@test.com".into();
        page.form.password = "secret1".into();

        page.submit().await.unwrap();

        assert!(h.store.is_authenticated());
        assert_eq!(h.navigator.routes(), vec![Route::Techniques]);
    }

    #[tokio::test]
    async fn login_defaults_to_dashboard() {
        let h = harness();
        let mut page = LoginPage::new(h.store.clone(), h.navigator.clone(), &Route::login());
        page.form.email = "user@test.com".into();
        page.form.password = "secret1".into();

        page.submit().await.unwrap();

        assert_eq!(h.navigator.routes(), vec![Route::Dashboard]);
        assert_eq!(h.auth.calls(), vec!["login".to_string()]);
    }

    #[tokio::test]
    async fn authenticated_visitor_is_bounced() {
        let h = harness();
        let page = LoginPage::new(h.store.clone(), h.navigator.clone(), &Route::login());
        assert!(!page.on_enter());

        h.store
            .login(&LoginRequest {
                email: "user@test.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();

        assert!(page.on_enter());
        assert_eq!(h.navigator.routes(), vec![Route::Dashboard]);
    }

    #[tokio::test]
    async fn signup_requires_matching_confirmation() {
        let h = harness();
        let mut page = SignupPage::new(h.store.clone(), h.navigator.clone());
        page.form.email = "new@test.com".into();
        page.form.password = "abcd1234".into();
        page.form.nickname = "Newbie".into();
        page.confirm_password = "abcd12345".into();

        assert!(page.submit().await.is_err());
        assert!(page.errors().get(Field::ConfirmPassword).is_some());
        assert!(h.auth.calls().is_empty());

        page.confirm_password = "abcd1234".into();
        page.submit().await.unwrap();
        assert_eq!(h.auth.calls(), vec!["signup".to_string()]);
        assert_eq!(h.navigator.routes(), vec![Route::Dashboard]);
    }

    #[test]
    fn selected_plan_is_carried_into_the_form() {
        let h = harness();
        let entered = Route::Login {
            from: None,
            selected_plan: Some(2),
        };
        let page = LoginPage::new(h.store.clone(), h.navigator.clone(), &entered);
        assert_eq!(page.selected_plan(), Some(2));
        assert_eq!(page.return_target(), Route::Dashboard);
    }
}
