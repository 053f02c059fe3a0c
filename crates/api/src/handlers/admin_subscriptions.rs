//! Admin oversight of subscriptions, with the payment ledger listed
//! read-only.

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_TEXT_LENGTH};
use cinestream_core::types::DbId;
use cinestream_db::models::payment::PaymentDetail;
use cinestream_db::models::platform::StreamingPlatform;
use cinestream_db::models::subscription::{SubscriptionDetail, UpdateSubscription};
use cinestream_db::repositories::{PaymentRepo, PlatformRepo, SubscriptionRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::{unknown_action, EditQuery};
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{render_with_status, Layout, Submission};
use crate::state::AppState;

/// Body of `POST /admin/subscriptions`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminSubscriptionForm {
    pub action: String,
    pub id: String,
    pub platform_id: String,
    pub start_date: String,
    pub end_date: String,
    pub plan_type: String,
}

enum AdminSubscriptionAction {
    Edit(DbId, UpdateSubscription),
    Delete(DbId),
}

impl AdminSubscriptionForm {
    fn into_action(self) -> Result<AdminSubscriptionAction, CoreError> {
        match self.action.as_str() {
            "edit_subscription" => Ok(AdminSubscriptionAction::Edit(
                input::parse_id("Subscription", &self.id)?,
                UpdateSubscription {
                    platform_id: input::optional(&self.platform_id, |v| {
                        input::parse_id("Platform", v)
                    })?,
                    start_date: input::optional(&self.start_date, |v| {
                        input::parse_date("Start date", v)
                    })?,
                    end_date: input::optional(&self.end_date, |v| {
                        input::parse_date("End date", v)
                    })?,
                    plan_type: input::optional(&self.plan_type, |v| {
                        input::required_text("Plan type", v, MAX_TEXT_LENGTH)
                    })?,
                },
            )),
            "delete_subscription" => Ok(AdminSubscriptionAction::Delete(input::parse_id(
                "Subscription",
                &self.id,
            )?)),
            other => Err(unknown_action(other)),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/subscriptions.html")]
struct AdminSubscriptionsPage {
    layout: Layout,
    subscriptions: Vec<SubscriptionDetail>,
    payments: Vec<PaymentDetail>,
    platforms: Vec<StreamingPlatform>,
    editing: Option<SubscriptionDetail>,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Subscription",
        id,
    }
}

/// GET /admin/subscriptions
pub async fn subscriptions_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<EditQuery>,
) -> AppResult<Response> {
    render_page(&state, &admin, None, query.id()).await
}

/// POST /admin/subscriptions
pub async fn submit_subscription(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<AdminSubscriptionForm>,
) -> AppResult<Response> {
    let result = apply(&state, &admin, form).await;
    let submission = Submission::from_result(result)?;
    render_page(&state, &admin, Some(submission), None).await
}

async fn apply(
    state: &AppState,
    admin: &SessionUser,
    form: AdminSubscriptionForm,
) -> AppResult<String> {
    match form.into_action()? {
        AdminSubscriptionAction::Edit(id, input) => {
            SubscriptionRepo::update(&state.pool, id, &input)
                .await?
                .ok_or_else(|| not_found(id))?;
            tracing::info!(admin_id = admin.user_id, subscription_id = id, "Subscription updated");
            Ok(format!("Subscription {id} updated"))
        }
        AdminSubscriptionAction::Delete(id) => {
            if !SubscriptionRepo::delete(&state.pool, id).await? {
                return Err(not_found(id).into());
            }
            tracing::info!(admin_id = admin.user_id, subscription_id = id, "Subscription deleted");
            Ok(format!("Subscription {id} deleted"))
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
    let subscriptions = SubscriptionRepo::list_detailed(&state.pool).await?;

    let editing = match edit_id {
        Some(id) => {
            let subscription = subscriptions.iter().find(|s| s.id == id).cloned();
            if subscription.is_none() {
                let missing = Submission::missing(not_found(id));
                status = missing.status;
                notice = Some(missing.notice);
            }
            subscription
        }
        None => None,
    };

    let page = AdminSubscriptionsPage {
        layout: Layout::for_user(admin).with_notice(notice),
        subscriptions,
        payments: PaymentRepo::list_detailed(&state.pool).await?,
        platforms: PlatformRepo::list(&state.pool).await?,
        editing,
    };
    render_with_status(status, &page)
}
