//! Admin oversight of the recommendation / activity log.

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_LONG_TEXT_LENGTH};
use cinestream_core::types::DbId;
use cinestream_db::models::recommendation::{RecommendationDetail, UpdateRecommendation};
use cinestream_db::repositories::RecommendationRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::{unknown_action, EditQuery};
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{render_with_status, Layout, Submission};
use crate::state::AppState;

/// Body of `POST /admin/recommendations`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminRecommendationForm {
    pub action: String,
    pub id: String,
    pub movie_id: String,
    pub reason: String,
}

enum AdminRecommendationAction {
    Edit(DbId, UpdateRecommendation),
    Delete(DbId),
}

impl AdminRecommendationForm {
    fn into_action(self) -> Result<AdminRecommendationAction, CoreError> {
        match self.action.as_str() {
            "edit_recommendation" => Ok(AdminRecommendationAction::Edit(
                input::parse_id("Recommendation", &self.id)?,
                UpdateRecommendation {
                    movie_id: input::optional(&self.movie_id, |v| input::parse_id("Movie", v))?,
                    reason: input::optional(&self.reason, |v| {
                        input::required_text("Reason", v, MAX_LONG_TEXT_LENGTH)
                    })?,
                },
            )),
            "delete_recommendation" => Ok(AdminRecommendationAction::Delete(input::parse_id(
                "Recommendation",
                &self.id,
            )?)),
            other => Err(unknown_action(other)),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/recommendations.html")]
struct AdminRecommendationsPage {
    layout: Layout,
    recommendations: Vec<RecommendationDetail>,
    editing: Option<RecommendationDetail>,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Recommendation",
        id,
    }
}

/// GET /admin/recommendations
pub async fn recommendations_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<EditQuery>,
) -> AppResult<Response> {
    render_page(&state, &admin, None, query.id()).await
}

/// POST /admin/recommendations
pub async fn submit_recommendation(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<AdminRecommendationForm>,
) -> AppResult<Response> {
    let result = apply(&state, &admin, form).await;
    let submission = Submission::from_result(result)?;
    render_page(&state, &admin, Some(submission), None).await
}

async fn apply(
    state: &AppState,
    admin: &SessionUser,
    form: AdminRecommendationForm,
) -> AppResult<String> {
    match form.into_action()? {
        AdminRecommendationAction::Edit(id, input) => {
            RecommendationRepo::update(&state.pool, id, &input)
                .await?
                .ok_or_else(|| not_found(id))?;
            tracing::info!(admin_id = admin.user_id, recommendation_id = id, "Recommendation updated");
            Ok(format!("Recommendation {id} updated"))
        }
        AdminRecommendationAction::Delete(id) => {
            if !RecommendationRepo::delete(&state.pool, id).await? {
                return Err(not_found(id).into());
            }
            tracing::info!(admin_id = admin.user_id, recommendation_id = id, "Recommendation deleted");
            Ok(format!("Recommendation {id} deleted"))
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
    let recommendations = RecommendationRepo::list_detailed(&state.pool).await?;

    let editing = match edit_id {
        Some(id) => {
            let row = recommendations.iter().find(|r| r.id == id).cloned();
            if row.is_none() {
                let missing = Submission::missing(not_found(id));
                status = missing.status;
                notice = Some(missing.notice);
            }
            row
        }
        None => None,
    };

    let page = AdminRecommendationsPage {
        layout: Layout::for_user(admin).with_notice(notice),
        recommendations,
        editing,
    };
    render_with_status(status, &page)
}
