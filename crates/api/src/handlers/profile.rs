//! The signed-in user's own profile.

use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_TEXT_LENGTH};
use cinestream_core::preference::Preference;
use cinestream_db::models::user::{UpdateUser, User};
use cinestream_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::{issue_session_cookie, session_for};
use crate::handlers::unknown_action;
use crate::middleware::auth::SessionUser;
use crate::response::{render_with_status, Layout, Notice, Submission};
use crate::state::AppState;

/// Body of `POST /profile`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub action: String,
    pub name: String,
    pub age: String,
    pub preference: String,
    pub current_password: String,
    pub new_password: String,
}

enum ProfileAction {
    Update(UpdateUser),
    ChangePassword { current: String, new: String },
}

impl ProfileForm {
    fn into_action(self) -> Result<ProfileAction, CoreError> {
        match self.action.as_str() {
            "update_profile" => Ok(ProfileAction::Update(UpdateUser {
                name: Some(input::required_text("Name", &self.name, MAX_TEXT_LENGTH)?),
                age: input::parse_age(&self.age)?,
                email: None,
                preference: Some(input::parse_choice::<Preference>(&self.preference)?),
            })),
            "change_password" => {
                validate_password_strength(&self.new_password, MIN_PASSWORD_LENGTH)
                    .map_err(CoreError::Validation)?;
                Ok(ProfileAction::ChangePassword {
                    current: self.current_password,
                    new: self.new_password,
                })
            }
            other => Err(unknown_action(other)),
        }
    }
}

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfilePage {
    layout: Layout,
    profile: User,
    preferences: [Preference; 3],
}

/// GET /profile
pub async fn profile_page(State(state): State<AppState>, user: SessionUser) -> AppResult<Response> {
    let profile = load_profile(&state, &user).await?;
    render(StatusCode::OK, user, profile, None)
}

/// POST /profile
///
/// A successful profile update re-issues the session cookie so the new name
/// and preference apply on the next page.
pub async fn update_profile(
    State(state): State<AppState>,
    user: SessionUser,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let result = apply(&state, &user, form).await;

    match result {
        Ok(Some(updated)) => {
            tracing::info!(user_id = user.user_id, "Profile updated");
            let session = session_for(&updated, user.role);
            let cookie = issue_session_cookie(&state, &session)?;
            let page = render(
                StatusCode::OK,
                session,
                updated,
                Some(Notice::success("Profile updated")),
            )?;
            Ok(([(header::SET_COOKIE, cookie)], page).into_response())
        }
        Ok(None) => {
            tracing::info!(user_id = user.user_id, "Password changed");
            let profile = load_profile(&state, &user).await?;
            render(
                StatusCode::OK,
                user,
                profile,
                Some(Notice::success("Password changed")),
            )
        }
        Err(err) => {
            let submission = Submission::from_result(Err(err))?;
            let profile = load_profile(&state, &user).await?;
            render(submission.status, user, profile, Some(submission.notice))
        }
    }
}

/// Apply a profile form. Returns the updated user for profile changes and
/// `None` for a password change.
async fn apply(state: &AppState, user: &SessionUser, form: ProfileForm) -> AppResult<Option<User>> {
    match form.into_action()? {
        ProfileAction::Update(input) => {
            let updated = UserRepo::update(&state.pool, user.user_id, &input)
                .await?
                .ok_or_else(session_gone)?;
            Ok(Some(updated))
        }
        ProfileAction::ChangePassword { current, new } => {
            let profile = load_profile(state, user).await?;
            let valid = verify_password(&current, &profile.password_hash).map_err(|e| {
                AppError::InternalError(format!("Password verification error: {e}"))
            })?;
            if !valid {
                return Err(CoreError::Validation("Current password is incorrect".into()).into());
            }
            let hash = hash_password(&new)
                .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
            UserRepo::update_password(&state.pool, user.user_id, &hash).await?;
            Ok(None)
        }
    }
}

async fn load_profile(state: &AppState, user: &SessionUser) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(session_gone)
}

fn session_gone() -> AppError {
    AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
}

fn render(
    status: StatusCode,
    user: SessionUser,
    profile: User,
    notice: Option<Notice>,
) -> AppResult<Response> {
    let page = ProfilePage {
        layout: Layout::for_user(&user).with_notice(notice),
        profile,
        preferences: Preference::ALL,
    };
    render_with_status(status, &page)
}
