use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits/add", post(handlers::add_habit_form))
        .route("/habits/remove", post(handlers::remove_habit_form))
        .route("/rewards/add", post(handlers::add_reward_form))
        .route("/rewards/remove", post(handlers::remove_reward_form))
        .route("/redeem", post(handlers::redeem_form))
        .route("/api/today", get(handlers::get_today))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/calendar/:month", get(handlers::get_calendar))
        .route("/api/habits", post(handlers::add_habit))
        .route("/api/habits/remove", post(handlers::remove_habit))
        .route("/api/rewards", post(handlers::add_reward))
        .route("/api/rewards/remove", post(handlers::remove_reward))
        .route("/api/checkin", post(handlers::check_in))
        .route("/api/redeem", post(handlers::redeem))
        .with_state(state)
}
