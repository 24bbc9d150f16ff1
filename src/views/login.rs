use tracing::warn;

use crate::models::Session;
use crate::MerchantClient;

/// Client-side destinations a view can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    MerchantLogin,
    MerchantDashboard,
    MerchantInventory,
    MerchantRequests,
    MerchantReservations,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::MerchantLogin => "/merchant/login",
            Route::MerchantDashboard => "/merchant/dashboard",
            Route::MerchantInventory => "/merchant/inventory",
            Route::MerchantRequests => "/merchant/requests",
            Route::MerchantReservations => "/merchant/reservations",
        }
    }
}

/// Merchant login form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Inline error under the form; backend messages are shown verbatim.
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.username.trim().is_empty() {
            problems.push("Username is required".to_string());
        }
        if self.password.is_empty() {
            problems.push("Password is required".to_string());
        }
        problems
    }

    /// Submit the form. On success the session is stored and the dashboard
    /// route is returned; on failure nothing is stored and `error` is set.
    pub async fn submit(&mut self, client: &MerchantClient) -> Option<Route> {
        let problems = self.validate();
        if !problems.is_empty() {
            self.error = Some(problems.join("\n"));
            return None;
        }
        self.submitting = true;
        self.error = None;
        let result: crate::Result<Session> =
            client.auth().login(&self.username, &self.password).await;
        self.submitting = false;
        match result {
            Ok(_) => {
                self.password.clear();
                Some(Route::MerchantDashboard)
            }
            Err(e) => {
                warn!(error = %e, "merchant login failed");
                self.error = Some(e.user_message());
                None
            }
        }
    }
}

/// Where a protected merchant view should go for the current session.
pub fn guard(client: &MerchantClient, wanted: Route) -> Route {
    if client.session().is_authenticated() {
        wanted
    } else {
        Route::MerchantLogin
    }
}
