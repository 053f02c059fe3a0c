//! Viewer bookings: list, book a seat, cancel.

use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use cinestream_core::error::CoreError;
use cinestream_core::input::{self, MAX_TEXT_LENGTH};
use cinestream_core::recommendation::REASON_BOOKED;
use cinestream_core::types::DbId;
use cinestream_db::models::booking::{BookingDetail, CreateBooking};
use cinestream_db::models::showtime::ShowtimeDetail;
use cinestream_db::repositories::booking_repo::{BookingError, SEAT_CONSTRAINT};
use cinestream_db::repositories::{BookingRepo, ShowtimeRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{today, unknown_action};
use crate::middleware::auth::SessionUser;
use crate::middleware::rbac::RequireViewer;
use crate::response::{render_with_status, Layout, Notice, Submission};
use crate::state::AppState;

/// Body of `POST /bookings`. Also used (from the query string) to prefill
/// the booking form.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub action: String,
    pub booking_id: String,
    pub movie_id: String,
    pub cinema_id: String,
    pub booking_date: String,
    pub show_time: String,
    pub seat_number: String,
}

enum BookingAction {
    Book(CreateBooking),
    Cancel(DbId),
}

impl BookingForm {
    fn into_action(self, user_id: DbId) -> Result<BookingAction, CoreError> {
        match self.action.as_str() {
            "book" => Ok(BookingAction::Book(CreateBooking {
                user_id,
                movie_id: input::parse_id("Movie", &self.movie_id)?,
                cinema_id: input::parse_id("Cinema", &self.cinema_id)?,
                booking_date: input::parse_date("Booking date", &self.booking_date)?,
                show_time: input::parse_time("Show time", &self.show_time)?,
                seat_number: input::required_text("Seat number", &self.seat_number, MAX_TEXT_LENGTH)?,
            })),
            "cancel" => Ok(BookingAction::Cancel(input::parse_id(
                "Booking",
                &self.booking_id,
            )?)),
            other => Err(unknown_action(other)),
        }
    }

    /// Copy of the form for re-display after a failed booking.
    fn prefill(&self) -> BookingForm {
        BookingForm {
            action: String::new(),
            booking_id: String::new(),
            ..self.clone()
        }
    }
}

#[derive(Template)]
#[template(path = "bookings.html")]
struct BookingsPage {
    layout: Layout,
    bookings: Vec<BookingDetail>,
    showtimes: Vec<ShowtimeDetail>,
    form: BookingForm,
}

/// GET /bookings
///
/// Query parameters (`movie_id`, `cinema_id`, `booking_date`, `show_time`)
/// prefill the booking form.
pub async fn bookings_page(
    State(state): State<AppState>,
    RequireViewer(user): RequireViewer,
    Query(prefill): Query<BookingForm>,
) -> AppResult<Response> {
    render_page(&state, &user, StatusCode::OK, None, prefill.prefill()).await
}

/// POST /bookings
pub async fn submit_booking(
    State(state): State<AppState>,
    RequireViewer(user): RequireViewer,
    Form(form): Form<BookingForm>,
) -> AppResult<Response> {
    let prefill = form.prefill();
    let result = apply(&state, &user, form).await;
    let keep_form = result.is_err();
    let submission = Submission::from_result(result)?;

    let form = if keep_form { prefill } else { BookingForm::default() };
    render_page(&state, &user, submission.status, Some(submission.notice), form).await
}

async fn apply(state: &AppState, user: &SessionUser, form: BookingForm) -> AppResult<String> {
    match form.into_action(user.user_id)? {
        BookingAction::Book(input) => book(state, input).await,
        BookingAction::Cancel(id) => {
            if !BookingRepo::delete_for_user(&state.pool, id, user.user_id).await? {
                return Err(CoreError::NotFound {
                    entity: "Booking",
                    id,
                }
                .into());
            }
            tracing::info!(user_id = user.user_id, booking_id = id, "Booking cancelled");
            Ok("Booking cancelled".to_string())
        }
    }
}

/// Book a seat for an existing showtime.
///
/// Capacity is checked inside the booking transaction. The seat itself is
/// protected by the `uq_bookings_seat` constraint; a violation becomes a
/// "Seat unavailable" conflict.
async fn book(state: &AppState, input: CreateBooking) -> AppResult<String> {
    let slot = ShowtimeRepo::find_slot(
        &state.pool,
        input.cinema_id,
        input.movie_id,
        input.booking_date,
        input.show_time,
    )
    .await?
    .ok_or_else(|| no_showing(&input))?;

    if slot.show_date < today() {
        return Err(CoreError::Validation("That showing has already taken place".into()).into());
    }

    let booking = BookingRepo::create_with_activity(&state.pool, &input, REASON_BOOKED)
        .await
        .map_err(|e| booking_refused(e, &input))?;

    tracing::info!(
        user_id = booking.user_id,
        booking_id = booking.id,
        movie_id = booking.movie_id,
        cinema_id = booking.cinema_id,
        "Seat booked"
    );
    Ok(format!(
        "Booked seat {} for {} at {} on {} at {}",
        booking.seat_number,
        slot.movie_title,
        slot.cinema_name,
        booking.booking_date,
        slot.time_label()
    ))
}

fn no_showing(input: &CreateBooking) -> CoreError {
    CoreError::Validation(format!(
        "There is no showing of that movie at that cinema on {} at {}",
        input.booking_date,
        input.show_time.format("%H:%M")
    ))
}

/// Map a refused booking write to the message the viewer sees.
fn booking_refused(err: BookingError, input: &CreateBooking) -> AppError {
    match err {
        BookingError::NoShowing => no_showing(input).into(),
        BookingError::SoldOut => CoreError::Conflict("That showing is sold out".into()).into(),
        BookingError::Database(err) => seat_conflict(err, &input.seat_number),
    }
}

fn seat_conflict(err: sqlx::Error, seat: &str) -> AppError {
    let err = AppError::Database(err);
    if err.violated_constraint() == Some(SEAT_CONSTRAINT) {
        return CoreError::Conflict(format!(
            "Seat unavailable: seat {seat} is already booked for that show"
        ))
        .into();
    }
    err
}

async fn render_page(
    state: &AppState,
    user: &SessionUser,
    status: StatusCode,
    notice: Option<Notice>,
    form: BookingForm,
) -> AppResult<Response> {
    let bookings = BookingRepo::list_for_user(&state.pool, user.user_id).await?;
    let today = today();
    let showtimes = ShowtimeRepo::list_detailed(&state.pool)
        .await?
        .into_iter()
        .filter(|s| s.show_date >= today)
        .collect();

    let page = BookingsPage {
        layout: Layout::for_user(user).with_notice(notice),
        bookings,
        showtimes,
        form,
    };
    render_with_status(status, &page)
}
