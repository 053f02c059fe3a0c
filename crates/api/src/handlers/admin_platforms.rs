//! Admin management of streaming platforms and per-movie streaming prices.

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_LONG_TEXT_LENGTH, MAX_TEXT_LENGTH};
use cinestream_core::types::DbId;
use cinestream_db::models::movie::Movie;
use cinestream_db::models::platform::{
    CreatePlatform, CreateStreamingService, StreamingPlatform, StreamingServiceDetail,
    UpdatePlatform, UpdateStreamingService,
};
use cinestream_db::repositories::{MovieRepo, PlatformRepo, StreamingServiceRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::{parse_edit_id, unknown_action};
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{render_with_status, Layout, Submission};
use crate::state::AppState;

/// Body of `POST /admin/platforms`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlatformForm {
    pub action: String,
    pub id: String,
    pub platform_name: String,
    pub website: String,
    pub movie_id: String,
    pub platform_id: String,
    pub price_720p: String,
    pub price_1080p: String,
    pub price_4k: String,
}

enum PlatformAction {
    AddPlatform(CreatePlatform),
    EditPlatform(DbId, UpdatePlatform),
    DeletePlatform(DbId),
    AddService(CreateStreamingService),
    EditService(DbId, UpdateStreamingService),
    DeleteService(DbId),
}

impl PlatformForm {
    fn into_action(self) -> Result<PlatformAction, CoreError> {
        match self.action.as_str() {
            "add_platform" => Ok(PlatformAction::AddPlatform(CreatePlatform {
                platform_name: input::required_text("Platform name", &self.platform_name, MAX_TEXT_LENGTH)?,
                website: input::required_text("Website", &self.website, MAX_LONG_TEXT_LENGTH)?,
            })),
            "edit_platform" => Ok(PlatformAction::EditPlatform(
                input::parse_id("Platform", &self.id)?,
                UpdatePlatform {
                    platform_name: input::optional(&self.platform_name, |v| {
                        input::required_text("Platform name", v, MAX_TEXT_LENGTH)
                    })?,
                    website: input::optional(&self.website, |v| {
                        input::required_text("Website", v, MAX_LONG_TEXT_LENGTH)
                    })?,
                },
            )),
            "delete_platform" => Ok(PlatformAction::DeletePlatform(input::parse_id(
                "Platform",
                &self.id,
            )?)),
            "add_service" => Ok(PlatformAction::AddService(CreateStreamingService {
                movie_id: input::parse_id("Movie", &self.movie_id)?,
                platform_id: input::parse_id("Platform", &self.platform_id)?,
                price_720p_cents: input::parse_price("720p price", &self.price_720p)?,
                price_1080p_cents: input::parse_price("1080p price", &self.price_1080p)?,
                price_4k_cents: input::parse_price("4K price", &self.price_4k)?,
            })),
            "edit_service" => Ok(PlatformAction::EditService(
                input::parse_id("Streaming service", &self.id)?,
                UpdateStreamingService {
                    price_720p_cents: input::optional(&self.price_720p, |v| {
                        input::parse_price("720p price", v)
                    })?,
                    price_1080p_cents: input::optional(&self.price_1080p, |v| {
                        input::parse_price("1080p price", v)
                    })?,
                    price_4k_cents: input::optional(&self.price_4k, |v| {
                        input::parse_price("4K price", v)
                    })?,
                },
            )),
            "delete_service" => Ok(PlatformAction::DeleteService(input::parse_id(
                "Streaming service",
                &self.id,
            )?)),
            other => Err(unknown_action(other)),
        }
    }
}

/// `?edit=<platform id>` or `?edit_service=<service id>`.
#[derive(Debug, Default, Deserialize)]
pub struct PlatformEditQuery {
    #[serde(default)]
    pub edit: Option<String>,
    #[serde(default)]
    pub edit_service: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/platforms.html")]
struct AdminPlatformsPage {
    layout: Layout,
    platforms: Vec<StreamingPlatform>,
    services: Vec<StreamingServiceDetail>,
    movies: Vec<Movie>,
    editing_platform: Option<StreamingPlatform>,
    editing_service: Option<StreamingServiceDetail>,
}

fn platform_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Platform",
        id,
    }
}

fn service_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Streaming service",
        id,
    }
}

/// GET /admin/platforms
pub async fn platforms_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<PlatformEditQuery>,
) -> AppResult<Response> {
    render_page(&state, &admin, None, &query).await
}

/// POST /admin/platforms
pub async fn submit_platform(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<PlatformForm>,
) -> AppResult<Response> {
    let result = apply(&state, &admin, form).await;
    let submission = Submission::from_result(result)?;
    render_page(&state, &admin, Some(submission), &PlatformEditQuery::default()).await
}

async fn apply(state: &AppState, admin: &SessionUser, form: PlatformForm) -> AppResult<String> {
    match form.into_action()? {
        PlatformAction::AddPlatform(input) => {
            let platform = PlatformRepo::create(&state.pool, &input).await?;
            tracing::info!(admin_id = admin.user_id, platform_id = platform.id, "Platform added");
            Ok(format!("Platform \"{}\" added", platform.platform_name))
        }
        PlatformAction::EditPlatform(id, input) => {
            let platform = PlatformRepo::update(&state.pool, id, &input)
                .await?
                .ok_or_else(|| platform_not_found(id))?;
            tracing::info!(admin_id = admin.user_id, platform_id = id, "Platform updated");
            Ok(format!("Platform \"{}\" updated", platform.platform_name))
        }
        PlatformAction::DeletePlatform(id) => {
            if !PlatformRepo::delete(&state.pool, id).await? {
                return Err(platform_not_found(id).into());
            }
            tracing::info!(admin_id = admin.user_id, platform_id = id, "Platform deleted");
            Ok(format!("Platform {id} deleted"))
        }
        PlatformAction::AddService(input) => {
            let service = StreamingServiceRepo::create(&state.pool, &input).await?;
            tracing::info!(
                admin_id = admin.user_id,
                service_id = service.id,
                movie_id = service.movie_id,
                platform_id = service.platform_id,
                "Streaming service added"
            );
            Ok("Streaming prices added".to_string())
        }
        PlatformAction::EditService(id, input) => {
            StreamingServiceRepo::update(&state.pool, id, &input)
                .await?
                .ok_or_else(|| service_not_found(id))?;
            tracing::info!(admin_id = admin.user_id, service_id = id, "Streaming service updated");
            Ok("Streaming prices updated".to_string())
        }
        PlatformAction::DeleteService(id) => {
            if !StreamingServiceRepo::delete(&state.pool, id).await? {
                return Err(service_not_found(id).into());
            }
            tracing::info!(admin_id = admin.user_id, service_id = id, "Streaming service deleted");
            Ok(format!("Streaming service {id} deleted"))
        }
    }
}

async fn render_page(
    state: &AppState,
    admin: &SessionUser,
    submission: Option<Submission>,
    query: &PlatformEditQuery,
) -> AppResult<Response> {
    let (mut status, mut notice) = Submission::into_parts(submission);
    let services = StreamingServiceRepo::list_detailed(&state.pool).await?;

    let editing_platform = match parse_edit_id(query.edit.as_deref()) {
        Some(id) => {
            let platform = PlatformRepo::find_by_id(&state.pool, id).await?;
            if platform.is_none() {
                let missing = Submission::missing(platform_not_found(id));
                status = missing.status;
                notice = Some(missing.notice);
            }
            platform
        }
        None => None,
    };

    let editing_service = match parse_edit_id(query.edit_service.as_deref()) {
        Some(id) => {
            let service = services.iter().find(|s| s.id == id).cloned();
            if service.is_none() {
                let missing = Submission::missing(service_not_found(id));
                status = missing.status;
                notice = Some(missing.notice);
            }
            service
        }
        None => None,
    };

    let page = AdminPlatformsPage {
        layout: Layout::for_user(admin).with_notice(notice),
        platforms: PlatformRepo::list(&state.pool).await?,
        services,
        movies: MovieRepo::list(&state.pool).await?,
        editing_platform,
        editing_service,
    };
    render_with_status(status, &page)
}
