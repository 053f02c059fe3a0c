//! Admin management of user accounts and their roles.

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_TEXT_LENGTH};
use cinestream_core::preference::Preference;
use cinestream_core::roles::Role;
use cinestream_core::types::DbId;
use cinestream_db::models::user::{CreateUser, UpdateUser, UserWithRole};
use cinestream_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::handlers::{unknown_action, EditQuery};
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{render_with_status, Layout, Submission};
use crate::state::AppState;

/// Body of `POST /admin/users`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub action: String,
    pub id: String,
    pub name: String,
    pub age: String,
    pub email: String,
    pub password: String,
    pub preference: String,
    pub role: String,
}

struct UserEdit {
    id: DbId,
    changes: UpdateUser,
    role: Option<Role>,
    password: Option<String>,
}

enum UserAction {
    /// New account; the password is still plaintext here.
    Add { user: CreateUser, password: String },
    Edit(UserEdit),
    Delete(DbId),
}

fn checked_password(raw: &str) -> Result<String, CoreError> {
    validate_password_strength(raw, MIN_PASSWORD_LENGTH).map_err(CoreError::Validation)?;
    Ok(raw.to_string())
}

impl UserForm {
    fn into_action(self) -> Result<UserAction, CoreError> {
        match self.action.as_str() {
            "add_user" => Ok(UserAction::Add {
                password: checked_password(&self.password)?,
                user: CreateUser {
                    name: input::required_text("Name", &self.name, MAX_TEXT_LENGTH)?,
                    age: input::parse_age(&self.age)?,
                    email: input::parse_email(&self.email)?,
                    password_hash: String::new(),
                    preference: input::optional(&self.preference, input::parse_choice::<Preference>)?
                        .unwrap_or_default(),
                    role: input::parse_choice::<Role>(&self.role)?,
                },
            }),
            "edit_user" => Ok(UserAction::Edit(UserEdit {
                id: input::parse_id("User", &self.id)?,
                changes: UpdateUser {
                    name: input::optional(&self.name, |v| {
                        input::required_text("Name", v, MAX_TEXT_LENGTH)
                    })?,
                    age: input::parse_age(&self.age)?,
                    email: input::optional(&self.email, input::parse_email)?,
                    preference: input::optional(&self.preference, input::parse_choice::<Preference>)?,
                },
                role: input::optional(&self.role, input::parse_choice::<Role>)?,
                password: input::optional(&self.password, checked_password)?,
            })),
            "delete_user" => Ok(UserAction::Delete(input::parse_id("User", &self.id)?)),
            other => Err(unknown_action(other)),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/users.html")]
struct AdminUsersPage {
    layout: Layout,
    users: Vec<UserWithRole>,
    editing: Option<UserWithRole>,
    preferences: [Preference; 3],
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "User", id }
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// GET /admin/users
pub async fn users_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<EditQuery>,
) -> AppResult<Response> {
    render_page(&state, &admin, None, query.id()).await
}

/// POST /admin/users
pub async fn submit_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<UserForm>,
) -> AppResult<Response> {
    let result = apply(&state, &admin, form).await;
    let submission = Submission::from_result(result)?;
    render_page(&state, &admin, Some(submission), None).await
}

async fn apply(state: &AppState, admin: &SessionUser, form: UserForm) -> AppResult<String> {
    match form.into_action()? {
        UserAction::Add { mut user, password } => {
            user.password_hash = hash(&password)?;
            let created = UserRepo::create(&state.pool, &user).await?;
            tracing::info!(
                admin_id = admin.user_id,
                user_id = created.id,
                role = %user.role,
                "User created"
            );
            Ok(format!("User {} created as {}", created.email, user.role))
        }
        UserAction::Edit(edit) => {
            if edit.id == admin.user_id && edit.role == Some(Role::Viewer) {
                return Err(
                    CoreError::Validation("You cannot remove your own admin role".into()).into(),
                );
            }

            let password_hash = edit.password.as_deref().map(hash).transpose()?;
            let updated = UserRepo::update_account(
                &state.pool,
                edit.id,
                &edit.changes,
                edit.role,
                password_hash.as_deref(),
            )
            .await?
            .ok_or_else(|| not_found(edit.id))?;
            tracing::info!(admin_id = admin.user_id, user_id = edit.id, "User updated");
            Ok(format!("User {} updated", updated.email))
        }
        UserAction::Delete(id) => {
            if id == admin.user_id {
                return Err(
                    CoreError::Validation("You cannot delete your own account".into()).into(),
                );
            }
            if !UserRepo::delete(&state.pool, id).await? {
                return Err(not_found(id).into());
            }
            tracing::info!(admin_id = admin.user_id, user_id = id, "User deleted");
            Ok(format!("User {id} deleted"))
        }
    }
}

async fn render_page(
    state: &AppState,
    admin: &SessionUser,
    submission: Option<Submission>,
    edit_id: Option<DbId>,
) -> AppResult<Response> {
    let (mut status, mut notice) = Submission::into_parts(submission);
    let users = UserRepo::list_with_roles(&state.pool).await?;

    let editing = match edit_id {
        Some(id) => {
            let user = users.iter().find(|u| u.id == id).cloned();
            if user.is_none() {
                let missing = Submission::missing(not_found(id));
                status = missing.status;
                notice = Some(missing.notice);
            }
            user
        }
        None => None,
    };

    let page = AdminUsersPage {
        layout: Layout::for_user(admin).with_notice(notice),
        users,
        editing,
        preferences: Preference::ALL,
    };
    render_with_status(status, &page)
}
