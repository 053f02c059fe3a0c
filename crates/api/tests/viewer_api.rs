//! Viewer flows: booking seats, subscribing and marking interest.

mod common;

use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveTime};
use common::{body_text, get_with_cookie, post_form, signed_in};
use cinestream_core::roles::Role;
use cinestream_db::models::cinema::{CreateCinema, CreateCinemaType};
use cinestream_db::models::movie::CreateMovie;
use cinestream_db::models::platform::CreatePlatform;
use cinestream_db::models::showtime::CreateShowtime;
use cinestream_db::repositories::{
    BookingRepo, CinemaRepo, CinemaTypeRepo, MovieRepo, PaymentRepo, PlatformRepo,
    RecommendationRepo, ShowtimeRepo, SubscriptionRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Show {
    movie_id: i64,
    cinema_id: i64,
}

async fn movie(pool: &PgPool, title: &str, genre: &str, rating: f64) -> i64 {
    MovieRepo::create(
        pool,
        &CreateMovie {
            title: title.to_string(),
            genre: genre.to_string(),
            release_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            language: "English".to_string(),
            duration_mins: 120,
            rating,
        },
    )
    .await
    .unwrap()
    .id
}

/// A movie playing at one cinema on `date` at 20:00 with `capacity` seats.
async fn schedule(pool: &PgPool, date: NaiveDate, capacity: i32) -> Show {
    let movie_id = movie(pool, "Dune", "Sci-Fi", 8.0).await;
    let cinema_type = CinemaTypeRepo::create(
        pool,
        &CreateCinemaType {
            type_name: "Standard".to_string(),
            price_cents: 1200,
        },
    )
    .await
    .unwrap();
    let cinema = CinemaRepo::create(
        pool,
        &CreateCinema {
            name: "Grand".to_string(),
            location: "Downtown".to_string(),
            type_id: cinema_type.id,
        },
    )
    .await
    .unwrap();
    ShowtimeRepo::create(
        pool,
        &CreateShowtime {
            cinema_id: cinema.id,
            movie_id,
            show_date: date,
            show_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            capacity,
        },
    )
    .await
    .unwrap();
    Show {
        movie_id,
        cinema_id: cinema.id,
    }
}

fn future_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 12, 31).unwrap()
}

fn book_body(show: &Show, date: NaiveDate, seat: &str) -> String {
    format!(
        "action=book&movie_id={}&cinema_id={}&booking_date={date}&show_time=20:00&seat_number={seat}",
        show.movie_id, show.cinema_id
    )
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_a_free_seat_succeeds_and_logs_activity(pool: PgPool) {
    let (user, cookie) = signed_in(&pool, "booker@test.com", Role::Viewer).await;
    let show = schedule(&pool, future_date(), 10).await;

    let response = post_form(
        common::build_test_app(pool.clone()),
        "/bookings",
        &book_body(&show, future_date(), "A1"),
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("Booked seat A1 for Dune at Grand on 2099-12-31 at 20:00"));

    assert_eq!(BookingRepo::list_for_user(&pool, user.id).await.unwrap().len(), 1);
    let history = RecommendationRepo::history_for_user(&pool, user.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].movie_id, show.movie_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn double_booking_reports_seat_unavailable(pool: PgPool) {
    let (_first, first_cookie) = signed_in(&pool, "first@test.com", Role::Viewer).await;
    let (_second, second_cookie) = signed_in(&pool, "second@test.com", Role::Viewer).await;
    let show = schedule(&pool, future_date(), 10).await;
    let body = book_body(&show, future_date(), "B7");

    let response = post_form(
        common::build_test_app(pool.clone()),
        "/bookings",
        &body,
        Some(&first_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_form(
        common::build_test_app(pool.clone()),
        "/bookings",
        &body,
        Some(&second_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_text(response)
        .await
        .contains("Seat unavailable: seat B7 is already booked for that show"));

    assert_eq!(BookingRepo::list_detailed(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_without_showing_is_rejected(pool: PgPool) {
    let (_user, cookie) = signed_in(&pool, "nowhere@test.com", Role::Viewer).await;
    let show = schedule(&pool, future_date(), 10).await;
    let other_day = NaiveDate::from_ymd_opt(2099, 12, 30).unwrap();

    let response = post_form(
        common::build_test_app(pool.clone()),
        "/bookings",
        &book_body(&show, other_day, "A1"),
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("There is no showing"));
    assert!(BookingRepo::list_detailed(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn past_showing_cannot_be_booked(pool: PgPool) {
    let (_user, cookie) = signed_in(&pool, "late@test.com", Role::Viewer).await;
    let past = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
    let show = schedule(&pool, past, 10).await;

    let response = post_form(
        common::build_test_app(pool),
        "/bookings",
        &book_body(&show, past, "A1"),
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response)
        .await
        .contains("That showing has already taken place"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sold_out_showing_is_rejected(pool: PgPool) {
    let (_user, cookie) = signed_in(&pool, "full@test.com", Role::Viewer).await;
    let show = schedule(&pool, future_date(), 1).await;

    post_form(
        common::build_test_app(pool.clone()),
        "/bookings",
        &book_body(&show, future_date(), "A1"),
        Some(&cookie),
    )
    .await;
    let response = post_form(
        common::build_test_app(pool),
        "/bookings",
        &book_body(&show, future_date(), "A2"),
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_text(response).await.contains("That showing is sold out"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn simultaneous_bookings_respect_capacity(pool: PgPool) {
    let show = schedule(&pool, future_date(), 1).await;

    let mut handles = Vec::new();
    for n in 0..6 {
        let (_user, cookie) = signed_in(&pool, &format!("rush{n}@test.com"), Role::Viewer).await;
        let app = common::build_test_app(pool.clone());
        let body = book_body(&show, future_date(), &format!("S{n}"));
        handles.push(tokio::spawn(async move {
            post_form(app, "/bookings", &body, Some(&cookie))
                .await
                .status()
        }));
    }

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::CONFLICT)
            .count(),
        5
    );
    assert_eq!(BookingRepo::list_detailed(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn viewer_can_cancel_only_own_booking(pool: PgPool) {
    let (owner, owner_cookie) = signed_in(&pool, "owner@test.com", Role::Viewer).await;
    let (_other, other_cookie) = signed_in(&pool, "other@test.com", Role::Viewer).await;
    let show = schedule(&pool, future_date(), 10).await;
    post_form(
        common::build_test_app(pool.clone()),
        "/bookings",
        &book_body(&show, future_date(), "C3"),
        Some(&owner_cookie),
    )
    .await;
    let booking_id = BookingRepo::list_for_user(&pool, owner.id).await.unwrap()[0].id;

    let response = post_form(
        common::build_test_app(pool.clone()),
        "/bookings",
        &format!("action=cancel&booking_id={booking_id}"),
        Some(&other_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_form(
        common::build_test_app(pool.clone()),
        "/bookings",
        &format!("action=cancel&booking_id={booking_id}"),
        Some(&owner_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Booking cancelled"));
    assert!(BookingRepo::list_for_user(&pool, owner.id)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn subscribing_records_payment_and_subscription(pool: PgPool) {
    let (user, cookie) = signed_in(&pool, "streamer@test.com", Role::Viewer).await;
    let platform = PlatformRepo::create(
        &pool,
        &CreatePlatform {
            platform_name: "FlixNet".to_string(),
            website: "https://flixnet.example".to_string(),
        },
    )
    .await
    .unwrap();

    let response = post_form(
        common::build_test_app(pool.clone()),
        "/subscriptions",
        &format!(
            "action=subscribe&platform_id={}&plan_type=monthly&amount=9.99&payment_method=PayPal",
            platform.id
        ),
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Subscribed to FlixNet (monthly)"));

    let subscriptions = SubscriptionRepo::list_for_user(&pool, user.id).await.unwrap();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].amount_cents, Some(999));
    let payments = PaymentRepo::list_for_user(&pool, user.id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].payment_method, "PayPal");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_payment_method_writes_nothing(pool: PgPool) {
    let (user, cookie) = signed_in(&pool, "barter@test.com", Role::Viewer).await;
    let platform = PlatformRepo::create(
        &pool,
        &CreatePlatform {
            platform_name: "FlixNet".to_string(),
            website: "https://flixnet.example".to_string(),
        },
    )
    .await
    .unwrap();

    let response = post_form(
        common::build_test_app(pool.clone()),
        "/subscriptions",
        &format!(
            "action=subscribe&platform_id={}&plan_type=monthly&amount=9.99&payment_method=Goats",
            platform.id
        ),
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(PaymentRepo::list_for_user(&pool, user.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn zero_amount_is_rejected_before_any_write(pool: PgPool) {
    let (user, cookie) = signed_in(&pool, "freebie@test.com", Role::Viewer).await;
    let platform = PlatformRepo::create(
        &pool,
        &CreatePlatform {
            platform_name: "FlixNet".to_string(),
            website: "https://flixnet.example".to_string(),
        },
    )
    .await
    .unwrap();

    let response = post_form(
        common::build_test_app(pool.clone()),
        "/subscriptions",
        &format!(
            "action=subscribe&platform_id={}&plan_type=monthly&amount=0&payment_method=PayPal",
            platform.id
        ),
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Amount must be greater than zero"));
    assert!(!body.contains("amount_cents_check"));
    assert!(PaymentRepo::list_for_user(&pool, user.id)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn marking_interest_personalises_recommendations(pool: PgPool) {
    let (user, cookie) = signed_in(&pool, "fan@test.com", Role::Viewer).await;
    let seed = movie(&pool, "Alien", "Sci-Fi", 8.5).await;
    movie(&pool, "Gravity", "Sci-Fi", 7.7).await;
    movie(&pool, "Heat", "Crime", 9.5).await;

    let before = get_with_cookie(
        common::build_test_app(pool.clone()),
        "/recommendations",
        &cookie,
    )
    .await;
    assert!(body_text(before).await.contains("Heat"));

    let response = post_form(
        common::build_test_app(pool.clone()),
        "/recommendations",
        &format!("action=mark_interested&movie_id={seed}"),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let picks = RecommendationRepo::recommend_for_user(&pool, user.id)
        .await
        .unwrap();
    let titles: Vec<_> = picks.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Gravity"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn interest_in_missing_movie_is_not_found(pool: PgPool) {
    let (_user, cookie) = signed_in(&pool, "ghost@test.com", Role::Viewer).await;

    let response = post_form(
        common::build_test_app(pool),
        "/recommendations",
        "action=mark_interested&movie_id=4242",
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
