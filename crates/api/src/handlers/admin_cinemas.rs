//! Admin management of cinemas and cinema types.
//!
//! Both live on one page. A cinema type still used by a cinema cannot be
//! deleted; the database rejects it and the page shows a conflict.

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_TEXT_LENGTH};
use cinestream_core::types::DbId;
use cinestream_db::models::cinema::{
    CinemaType, CinemaWithType, CreateCinema, CreateCinemaType, UpdateCinema, UpdateCinemaType,
};
use cinestream_db::repositories::{CinemaRepo, CinemaTypeRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::{parse_edit_id, unknown_action};
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{render_with_status, Layout, Submission};
use crate::state::AppState;

/// Body of `POST /admin/cinemas`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CinemaForm {
    pub action: String,
    pub id: String,
    pub name: String,
    pub location: String,
    pub type_id: String,
    pub type_name: String,
    pub price: String,
}

enum CinemaAction {
    AddCinema(CreateCinema),
    EditCinema(DbId, UpdateCinema),
    DeleteCinema(DbId),
    AddType(CreateCinemaType),
    EditType(DbId, UpdateCinemaType),
    DeleteType(DbId),
}

impl CinemaForm {
    fn into_action(self) -> Result<CinemaAction, CoreError> {
        match self.action.as_str() {
            "add_cinema" => Ok(CinemaAction::AddCinema(CreateCinema {
                name: input::required_text("Name", &self.name, MAX_TEXT_LENGTH)?,
                location: input::required_text("Location", &self.location, MAX_TEXT_LENGTH)?,
                type_id: input::parse_id("Cinema type", &self.type_id)?,
            })),
            "edit_cinema" => Ok(CinemaAction::EditCinema(
                input::parse_id("Cinema", &self.id)?,
                UpdateCinema {
                    name: input::optional(&self.name, |v| {
                        input::required_text("Name", v, MAX_TEXT_LENGTH)
                    })?,
                    location: input::optional(&self.location, |v| {
                        input::required_text("Location", v, MAX_TEXT_LENGTH)
                    })?,
                    type_id: input::optional(&self.type_id, |v| input::parse_id("Cinema type", v))?,
                },
            )),
            "delete_cinema" => Ok(CinemaAction::DeleteCinema(input::parse_id("Cinema", &self.id)?)),
            "add_type" => Ok(CinemaAction::AddType(CreateCinemaType {
                type_name: input::required_text("Type name", &self.type_name, MAX_TEXT_LENGTH)?,
                price_cents: input::parse_price("Price", &self.price)?,
            })),
            "edit_type" => Ok(CinemaAction::EditType(
                input::parse_id("Cinema type", &self.id)?,
                UpdateCinemaType {
                    type_name: input::optional(&self.type_name, |v| {
                        input::required_text("Type name", v, MAX_TEXT_LENGTH)
                    })?,
                    price_cents: input::optional(&self.price, |v| input::parse_price("Price", v))?,
                },
            )),
            "delete_type" => Ok(CinemaAction::DeleteType(input::parse_id(
                "Cinema type",
                &self.id,
            )?)),
            other => Err(unknown_action(other)),
        }
    }
}

/// `?edit=<cinema id>` or `?edit_type=<type id>`.
#[derive(Debug, Default, Deserialize)]
pub struct CinemaEditQuery {
    #[serde(default)]
    pub edit: Option<String>,
    #[serde(default)]
    pub edit_type: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/cinemas.html")]
struct AdminCinemasPage {
    layout: Layout,
    cinemas: Vec<CinemaWithType>,
    types: Vec<CinemaType>,
    editing_cinema: Option<CinemaWithType>,
    editing_type: Option<CinemaType>,
}

fn cinema_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Cinema",
        id,
    }
}

fn type_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Cinema type",
        id,
    }
}

/// GET /admin/cinemas
pub async fn cinemas_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<CinemaEditQuery>,
) -> AppResult<Response> {
    render_page(&state, &admin, None, &query).await
}

/// POST /admin/cinemas
pub async fn submit_cinema(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<CinemaForm>,
) -> AppResult<Response> {
    let result = apply(&state, &admin, form).await;
    let submission = Submission::from_result(result)?;
    render_page(&state, &admin, Some(submission), &CinemaEditQuery::default()).await
}

async fn apply(state: &AppState, admin: &SessionUser, form: CinemaForm) -> AppResult<String> {
    match form.into_action()? {
        CinemaAction::AddCinema(input) => {
            let cinema = CinemaRepo::create(&state.pool, &input).await?;
            tracing::info!(admin_id = admin.user_id, cinema_id = cinema.id, "Cinema added");
            Ok(format!("Cinema \"{}\" added", cinema.name))
        }
        CinemaAction::EditCinema(id, input) => {
            let cinema = CinemaRepo::update(&state.pool, id, &input)
                .await?
                .ok_or_else(|| cinema_not_found(id))?;
            tracing::info!(admin_id = admin.user_id, cinema_id = id, "Cinema updated");
            Ok(format!("Cinema \"{}\" updated", cinema.name))
        }
        CinemaAction::DeleteCinema(id) => {
            if !CinemaRepo::delete(&state.pool, id).await? {
                return Err(cinema_not_found(id).into());
            }
            tracing::info!(admin_id = admin.user_id, cinema_id = id, "Cinema deleted");
            Ok(format!("Cinema {id} deleted"))
        }
        CinemaAction::AddType(input) => {
            let cinema_type = CinemaTypeRepo::create(&state.pool, &input).await?;
            tracing::info!(admin_id = admin.user_id, type_id = cinema_type.id, "Cinema type added");
            Ok(format!("Cinema type \"{}\" added", cinema_type.type_name))
        }
        CinemaAction::EditType(id, input) => {
            let cinema_type = CinemaTypeRepo::update(&state.pool, id, &input)
                .await?
                .ok_or_else(|| type_not_found(id))?;
            tracing::info!(admin_id = admin.user_id, type_id = id, "Cinema type updated");
            Ok(format!("Cinema type \"{}\" updated", cinema_type.type_name))
        }
        CinemaAction::DeleteType(id) => {
            if !CinemaTypeRepo::delete(&state.pool, id).await? {
                return Err(type_not_found(id).into());
            }
            tracing::info!(admin_id = admin.user_id, type_id = id, "Cinema type deleted");
            Ok(format!("Cinema type {id} deleted"))
        }
    }
}

async fn render_page(
    state: &AppState,
    admin: &SessionUser,
    submission: Option<Submission>,
    query: &CinemaEditQuery,
) -> AppResult<Response> {
    let (mut status, mut notice) = Submission::into_parts(submission);

    let editing_cinema = match parse_edit_id(query.edit.as_deref()) {
        Some(id) => {
            let cinema = CinemaRepo::find_with_type(&state.pool, id).await?;
            if cinema.is_none() {
                let missing = Submission::missing(cinema_not_found(id));
                status = missing.status;
                notice = Some(missing.notice);
            }
            cinema
        }
        None => None,
    };

    let editing_type = match parse_edit_id(query.edit_type.as_deref()) {
        Some(id) => {
            let cinema_type = CinemaTypeRepo::find_by_id(&state.pool, id).await?;
            if cinema_type.is_none() {
                let missing = Submission::missing(type_not_found(id));
                status = missing.status;
                notice = Some(missing.notice);
            }
            cinema_type
        }
        None => None,
    };

    let page = AdminCinemasPage {
        layout: Layout::for_user(admin).with_notice(notice),
        cinemas: CinemaRepo::list_with_types(&state.pool).await?,
        types: CinemaTypeRepo::list(&state.pool).await?,
        editing_cinema,
        editing_type,
    };
    render_with_status(status, &page)
}
