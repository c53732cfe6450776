//! Authentication route handlers.
//!
//! Login and registration are delegated to the remote account API. The
//! returned user becomes the store's `user` slice; failures re-render the
//! form with a message instead of redirecting.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use cartwheel_core::{Email, Registration, User};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::CurrentStore;
use crate::routes::Page;
use crate::state::AppState;
use crate::store::{Action, Slot, Store, Ticket};
use crate::views::{Attempt, HeaderView, failure_message};

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
///
/// No `Debug`: the password is plain text until wrapped.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub title: &'static str,
    pub header: HeaderView,
    pub email: String,
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub title: &'static str,
    pub header: HeaderView,
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

impl LoginTemplate {
    fn new(store: &Store, email: String, error: Option<String>) -> Self {
        Self {
            title: Page::Login.title(),
            header: HeaderView::from(&*store.snapshot()),
            email,
            error,
        }
    }
}

impl RegisterTemplate {
    fn new(store: &Store, name: String, email: String, error: Option<String>) -> Self {
        Self {
            title: Page::Register.title(),
            header: HeaderView::from(&*store.snapshot()),
            name,
            email,
            error,
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(CurrentStore(store): CurrentStore) -> impl IntoResponse {
    LoginTemplate::new(&store, String::new(), None)
}

/// Handle login form submission.
///
/// On success the user is stored and the shopper is sent to the product
/// list.
pub async fn login(
    State(state): State<AppState>,
    CurrentStore(store): CurrentStore,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            let page = LoginTemplate::new(&store, form.email, Some(e.to_string()));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let password = SecretString::from(form.password);
    let ticket = store.begin(Slot::User);
    match state.api().login(&email, &password).await {
        Ok(user) => {
            sign_in(&store, &session, &ticket, user).await?;
            Ok(Redirect::to(Page::Home.path()).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            let message = failure_message(Attempt::Login, &e);
            Ok(LoginTemplate::new(&store, form.email, Some(message)).into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(CurrentStore(store): CurrentStore) -> impl IntoResponse {
    RegisterTemplate::new(&store, String::new(), String::new(), None)
}

/// Handle registration form submission.
///
/// The remote service assigns the user id; a successful registration signs
/// the shopper in. Name and email are kept on the form after a failure.
pub async fn register(
    State(state): State<AppState>,
    CurrentStore(store): CurrentStore,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let name = form.name.trim().to_string();
    if name.is_empty() {
        let page = RegisterTemplate::new(
            &store,
            name,
            form.email,
            Some("Name is required".to_string()),
        );
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            let page = RegisterTemplate::new(&store, name, form.email, Some(e.to_string()));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let registration = Registration {
        name,
        email,
        password: SecretString::from(form.password),
    };

    let ticket = store.begin(Slot::User);
    match state.api().register(&registration).await {
        Ok(user) => {
            sign_in(&store, &session, &ticket, user).await?;
            Ok(Redirect::to(Page::Home.path()).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            let message = failure_message(Attempt::Register, &e);
            let page = RegisterTemplate::new(
                &store,
                registration.name,
                form.email,
                Some(message),
            );
            Ok(page.into_response())
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
///
/// Also invalidates any login or registration still waiting on the remote
/// service for this session.
pub async fn logout(CurrentStore(store): CurrentStore) -> Redirect {
    let ticket = store.begin(Slot::User);
    store.dispatch_current(&ticket, Action::ClearUser);

    clear_sentry_user();
    add_breadcrumb("auth", "Logged out", None);

    Redirect::to(Page::Home.path())
}

/// Commit a user returned by the remote service.
///
/// The session id is rotated on sign-in; the store key travels with the
/// session data.
async fn sign_in(
    store: &Store,
    session: &Session,
    ticket: &Ticket,
    user: User,
) -> Result<()> {
    let user_id = user.id.to_string();
    let email = user.email.to_string();

    if !store.dispatch_current(ticket, Action::SetUser(user)) {
        return Ok(());
    }

    session.cycle_id().await?;
    set_sentry_user(&user_id, Some(&email));
    add_breadcrumb("auth", "Signed in", Some(&[("user_id", user_id.as_str())]));
    tracing::info!(user_id = %user_id, "Shopper signed in");

    Ok(())
}
