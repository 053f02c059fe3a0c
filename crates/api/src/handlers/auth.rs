//! Handlers for signing in, registering and signing out.

use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_TEXT_LENGTH};
use cinestream_core::preference::Preference;
use cinestream_core::roles::Role;
use cinestream_db::models::user::{CreateUser, User};
use cinestream_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::generate_session_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_dummy, verify_password,
    MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::SessionUser;
use crate::response::{render_with_status, Layout, Notice, Submission};
use crate::state::AppState;

/// Shown for both unknown emails and wrong passwords.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Shown when the credentials match but the account has no role marker.
pub const NO_ROLE_ASSIGNED: &str = "Account has no role assigned";

// ---------------------------------------------------------------------------
// Forms and templates
// ---------------------------------------------------------------------------

/// Body of `POST /login`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body of `POST /register`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub age: String,
    pub email: String,
    pub password: String,
    pub preference: String,
}

impl RegisterForm {
    /// Validate the form into a viewer account, hashing the password.
    fn into_create_user(self) -> AppResult<CreateUser> {
        let name = input::required_text("Name", &self.name, MAX_TEXT_LENGTH)?;
        let age = input::parse_age(&self.age)?;
        let email = input::parse_email(&self.email)?;
        validate_password_strength(&self.password, MIN_PASSWORD_LENGTH)
            .map_err(CoreError::Validation)?;
        let preference = if self.preference.trim().is_empty() {
            Preference::default()
        } else {
            input::parse_choice::<Preference>(&self.preference)?
        };

        let password_hash = hash_password(&self.password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        Ok(CreateUser {
            name,
            age,
            email,
            password_hash,
            preference,
            role: Role::Viewer,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub registered: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginPage {
    layout: Layout,
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterPage {
    layout: Layout,
    form: RegisterForm,
    preferences: [Preference; 3],
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /login
///
/// Signed-in users are sent to their home page.
pub async fn login_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LoginQuery>,
) -> AppResult<Response> {
    if let Ok(user) = SessionUser::from_headers(&headers, &state.config.jwt) {
        return Ok(Redirect::to(user.role.home_path()).into_response());
    }

    let notice = query
        .registered
        .map(|_| Notice::success("Registration successful. Please log in."));
    render_login(StatusCode::OK, notice)
}

/// POST /login
///
/// Verify email and password, resolve the role and set the session cookie.
/// Unknown emails and wrong passwords take the same path and render the
/// same page.
pub async fn login(
    State(state): State<AppState>,
    Form(input): Form<LoginForm>,
) -> AppResult<Response> {
    let email = input.email.trim().to_lowercase();

    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        verify_dummy(&input.password);
        tracing::warn!("Login failed: unknown email");
        return invalid_credentials();
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Login failed: wrong password");
        return invalid_credentials();
    }

    let Some(role) = UserRepo::resolve_role(&state.pool, user.id).await? else {
        tracing::warn!(user_id = user.id, "Login refused: no role assigned");
        return render_login(StatusCode::FORBIDDEN, Some(Notice::error(NO_ROLE_ASSIGNED)));
    };

    let session = session_for(&user, role);
    tracing::info!(user_id = user.id, role = %role, "User logged in");
    start_session(&state, &session, role.home_path())
}

/// GET /register
pub async fn register_page() -> AppResult<Response> {
    render_register(StatusCode::OK, RegisterForm::default(), None)
}

/// POST /register
///
/// Create a viewer account (user row and viewer marker in one transaction)
/// and send the visitor to the login page.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let echo = RegisterForm {
        name: form.name.clone(),
        age: form.age.clone(),
        email: form.email.clone(),
        password: String::new(),
        preference: form.preference.clone(),
    };

    let result = async {
        let input = form.into_create_user()?;
        let user = UserRepo::create(&state.pool, &input).await?;
        Ok::<_, AppError>(user)
    }
    .await;

    match result {
        Ok(user) => {
            tracing::info!(user_id = user.id, "Viewer registered");
            Ok(Redirect::to("/login?registered=1").into_response())
        }
        Err(err) => {
            let submission = Submission::from_result(Err(err))?;
            render_register(submission.status, echo, Some(submission.notice))
        }
    }
}

/// POST /logout
///
/// Drop the session cookie and return to the login page.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = clear_session_cookie(state.config.cookie_secure);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Session contents for a user who has just proven their identity.
pub(crate) fn session_for(user: &User, role: Role) -> SessionUser {
    SessionUser {
        user_id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        preference: user.preference(),
        role,
    }
}

/// `Set-Cookie` value carrying a fresh token for `session`.
pub(crate) fn issue_session_cookie(state: &AppState, session: &SessionUser) -> AppResult<String> {
    let token = generate_session_token(session, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(session_cookie(
        &token,
        state.config.jwt.session_max_age_secs(),
        state.config.cookie_secure,
    ))
}

fn start_session(state: &AppState, session: &SessionUser, to: &str) -> AppResult<Response> {
    let cookie = issue_session_cookie(state, session)?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(to)).into_response())
}

fn invalid_credentials() -> AppResult<Response> {
    render_login(
        StatusCode::UNAUTHORIZED,
        Some(Notice::error(INVALID_CREDENTIALS)),
    )
}

fn render_login(status: StatusCode, notice: Option<Notice>) -> AppResult<Response> {
    let page = LoginPage {
        layout: Layout::anonymous().with_notice(notice),
    };
    render_with_status(status, &page)
}

fn render_register(
    status: StatusCode,
    form: RegisterForm,
    notice: Option<Notice>,
) -> AppResult<Response> {
    let page = RegisterPage {
        layout: Layout::anonymous().with_notice(notice),
        form,
        preferences: Preference::ALL,
    };
    render_with_status(status, &page)
}
