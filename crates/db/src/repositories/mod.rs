//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Writes that span more than
//! one statement open their own transaction.

pub mod booking_repo;
pub mod cinema_repo;
pub mod cinema_type_repo;
pub mod dashboard_repo;
pub mod movie_repo;
pub mod payment_repo;
pub mod platform_repo;
pub mod recommendation_repo;
pub mod showtime_repo;
pub mod streaming_service_repo;
pub mod subscription_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use cinema_repo::CinemaRepo;
pub use cinema_type_repo::CinemaTypeRepo;
pub use dashboard_repo::DashboardRepo;
pub use movie_repo::MovieRepo;
pub use payment_repo::PaymentRepo;
pub use platform_repo::PlatformRepo;
pub use recommendation_repo::RecommendationRepo;
pub use showtime_repo::ShowtimeRepo;
pub use streaming_service_repo::StreamingServiceRepo;
pub use subscription_repo::SubscriptionRepo;
pub use user_repo::UserRepo;
