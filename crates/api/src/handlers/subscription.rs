//! Viewer subscriptions: list, subscribe (payment and subscription in one
//! transaction), payment history.

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_TEXT_LENGTH};
use cinestream_core::subscription::{
    plan_end_date, subscription_purpose, validate_payment_method, PAYMENT_METHODS,
};
use cinestream_core::types::{Cents, DbId};
use cinestream_db::models::payment::Payment;
use cinestream_db::models::platform::StreamingPlatform;
use cinestream_db::models::subscription::{NewPaidSubscription, SubscriptionDetail};
use cinestream_db::repositories::{PaymentRepo, PlatformRepo, SubscriptionRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::{today, unknown_action};
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireViewer;
use crate::response::{render_with_status, Layout, Notice, Submission};
use crate::state::AppState;

/// Body of `POST /subscriptions`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubscriptionForm {
    pub action: String,
    pub platform_id: String,
    pub plan_type: String,
    pub amount: String,
    pub payment_method: String,
}

struct SubscribeRequest {
    platform_id: DbId,
    plan_type: String,
    amount_cents: Cents,
    payment_method: String,
}

impl SubscriptionForm {
    fn into_request(self) -> Result<SubscribeRequest, CoreError> {
        if self.action != "subscribe" {
            return Err(unknown_action(&self.action));
        }
        let payment_method = self.payment_method.trim().to_string();
        validate_payment_method(&payment_method).map_err(CoreError::Validation)?;

        Ok(SubscribeRequest {
            platform_id: input::parse_id("Platform", &self.platform_id)?,
            plan_type: input::required_text("Plan type", &self.plan_type, MAX_TEXT_LENGTH)?,
            amount_cents: input::parse_payment("Amount", &self.amount)?,
            payment_method,
        })
    }
}

#[derive(Template)]
#[template(path = "subscriptions.html")]
struct SubscriptionsPage {
    layout: Layout,
    subscriptions: Vec<SubscriptionDetail>,
    payments: Vec<Payment>,
    platforms: Vec<StreamingPlatform>,
    payment_methods: &'static [&'static str],
    today: chrono::NaiveDate,
}

/// GET /subscriptions
pub async fn subscriptions_page(
    State(state): State<AppState>,
    RequireViewer(user): RequireViewer,
) -> AppResult<Response> {
    render_page(&state, &user, StatusCode::OK, None).await
}

/// POST /subscriptions
pub async fn submit_subscription(
    State(state): State<AppState>,
    RequireViewer(user): RequireViewer,
    Form(form): Form<SubscriptionForm>,
) -> AppResult<Response> {
    let result = subscribe(&state, &user, form).await;
    let submission = Submission::from_result(result)?;
    render_page(&state, &user, submission.status, Some(submission.notice)).await
}

/// Record the payment and the subscription it pays for. Either both rows
/// are stored or neither is.
async fn subscribe(state: &AppState, user: &SessionUser, form: SubscriptionForm) -> AppResult<String> {
    let request = form.into_request()?;

    let platform = PlatformRepo::find_by_id(&state.pool, request.platform_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Platform",
            id: request.platform_id,
        })?;

    let start_date = today();
    let input = NewPaidSubscription {
        user_id: user.user_id,
        platform_id: platform.id,
        start_date,
        end_date: plan_end_date(start_date, &request.plan_type),
        purpose: subscription_purpose(&platform.platform_name, &request.plan_type),
        plan_type: request.plan_type,
        amount_cents: request.amount_cents,
        payment_method: request.payment_method,
    };

    let (payment, subscription) = SubscriptionRepo::subscribe(&state.pool, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        subscription_id = subscription.id,
        payment_id = payment.id,
        platform_id = platform.id,
        "Subscription purchased"
    );

    Ok(format!(
        "Subscribed to {} ({}) until {}; paid {}",
        platform.platform_name,
        subscription.plan_type,
        subscription.end_date,
        payment.amount_label()
    ))
}

async fn render_page(
    state: &AppState,
    user: &SessionUser,
    status: StatusCode,
    notice: Option<Notice>,
) -> AppResult<Response> {
    let subscriptions = SubscriptionRepo::list_for_user(&state.pool, user.user_id).await?;
    let payments = PaymentRepo::list_for_user(&state.pool, user.user_id).await?;
    let platforms = PlatformRepo::list(&state.pool).await?;

    let page = SubscriptionsPage {
        layout: Layout::for_user(user).with_notice(notice),
        subscriptions,
        payments,
        platforms,
        payment_methods: PAYMENT_METHODS,
        today: today(),
    };
    render_with_status(status, &page)
}
