//! Admin oversight of bookings.

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_TEXT_LENGTH};
use cinestream_core::types::DbId;
use cinestream_db::models::booking::{BookingDetail, UpdateBooking};
use cinestream_db::repositories::booking_repo::BookingError;
use cinestream_db::repositories::BookingRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{unknown_action, EditQuery};
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{render_with_status, Layout, Submission};
use crate::state::AppState;

/// Body of `POST /admin/bookings`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminBookingForm {
    pub action: String,
    pub id: String,
    pub movie_id: String,
    pub cinema_id: String,
    pub booking_date: String,
    pub show_time: String,
    pub seat_number: String,
}

enum AdminBookingAction {
    Edit(DbId, UpdateBooking),
    Delete(DbId),
}

impl AdminBookingForm {
    fn into_action(self) -> Result<AdminBookingAction, CoreError> {
        match self.action.as_str() {
            "edit_booking" => Ok(AdminBookingAction::Edit(
                input::parse_id("Booking", &self.id)?,
                UpdateBooking {
                    movie_id: input::optional(&self.movie_id, |v| input::parse_id("Movie", v))?,
                    cinema_id: input::optional(&self.cinema_id, |v| input::parse_id("Cinema", v))?,
                    booking_date: input::optional(&self.booking_date, |v| {
                        input::parse_date("Booking date", v)
                    })?,
                    show_time: input::optional(&self.show_time, |v| {
                        input::parse_time("Show time", v)
                    })?,
                    seat_number: input::optional(&self.seat_number, |v| {
                        input::required_text("Seat number", v, MAX_TEXT_LENGTH)
                    })?,
                },
            )),
            "delete_booking" => Ok(AdminBookingAction::Delete(input::parse_id(
                "Booking",
                &self.id,
            )?)),
            other => Err(unknown_action(other)),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/bookings.html")]
struct AdminBookingsPage {
    layout: Layout,
    bookings: Vec<BookingDetail>,
    editing: Option<BookingDetail>,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Booking",
        id,
    }
}

/// A booking can only be moved onto an existing showing with a free seat.
fn move_refused(err: BookingError) -> AppError {
    match err {
        BookingError::NoShowing => CoreError::Validation(
            "There is no showing of that movie at that cinema at that date and time".into(),
        )
        .into(),
        BookingError::SoldOut => CoreError::Conflict("That showing is sold out".into()).into(),
        BookingError::Database(err) => err.into(),
    }
}

/// GET /admin/bookings
pub async fn bookings_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<EditQuery>,
) -> AppResult<Response> {
    render_page(&state, &admin, None, query.id()).await
}

/// POST /admin/bookings
pub async fn submit_booking(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<AdminBookingForm>,
) -> AppResult<Response> {
    let result = apply(&state, &admin, form).await;
    let submission = Submission::from_result(result)?;
    render_page(&state, &admin, Some(submission), None).await
}

async fn apply(state: &AppState, admin: &SessionUser, form: AdminBookingForm) -> AppResult<String> {
    match form.into_action()? {
        AdminBookingAction::Edit(id, input) => {
            BookingRepo::update(&state.pool, id, &input)
                .await
                .map_err(move_refused)?
                .ok_or_else(|| not_found(id))?;
            tracing::info!(admin_id = admin.user_id, booking_id = id, "Booking updated");
            Ok(format!("Booking {id} updated"))
        }
        AdminBookingAction::Delete(id) => {
            if !BookingRepo::delete(&state.pool, id).await? {
                return Err(not_found(id).into());
            }
            tracing::info!(admin_id = admin.user_id, booking_id = id, "Booking deleted");
            Ok(format!("Booking {id} deleted"))
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
    let bookings = BookingRepo::list_detailed(&state.pool).await?;

    let editing = match edit_id {
        Some(id) => {
            let booking = bookings.iter().find(|b| b.id == id).cloned();
            if booking.is_none() {
                let missing = Submission::missing(not_found(id));
                status = missing.status;
                notice = Some(missing.notice);
            }
            booking
        }
        None => None,
    };

    let page = AdminBookingsPage {
        layout: Layout::for_user(admin).with_notice(notice),
        bookings,
        editing,
    };
    render_with_status(status, &page)
}
