use crate::errors::AppError;
use crate::models::{
    CalendarResponse, CheckInPayload, CheckInResponse, CheckInStatus, HabitPayload,
    MutationResponse, NamePayload, RedeemResponse, RedeemStatus, RewardPayload, StatsResponse,
    TodayHabit, TodayResponse, TrackerData,
};
use crate::ops;
use crate::state::AppState;
use crate::stats;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::Local;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let date = today_string();
    let mut data = state.data.lock().await;
    // Viewing today counts as an entry for today; the key reaches disk with
    // the next save.
    ops::ensure_day(&mut data, &date);
    Html(render_index(&date, &data))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let date = today_string();
    let mut data = state.data.lock().await;
    ops::ensure_day(&mut data, &date);

    let done = data.checked.get(&date).map(Vec::as_slice).unwrap_or(&[]);
    let habits = data
        .habits
        .iter()
        .map(|(name, points)| TodayHabit {
            name: name.clone(),
            points: *points,
            checked: done.contains(name),
        })
        .collect();

    Ok(Json(TodayResponse {
        date,
        score: data.score,
        habits,
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(stats::build_stats(&data)))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<CalendarResponse>, AppError> {
    let well_formed = month.len() == 7
        && month
            .bytes()
            .enumerate()
            .all(|(i, b)| if i == 4 { b == b'-' } else { b.is_ascii_digit() });
    if !well_formed {
        return Err(AppError::bad_request("month must be formatted YYYY-MM"));
    }

    let data = state.data.lock().await;
    let days = stats::calendar_view(&data, &month);
    Ok(Json(CalendarResponse { month, days }))
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(payload): Json<HabitPayload>,
) -> Result<Json<MutationResponse>, AppError> {
    let response = apply_habit_add(&state, &payload.name, payload.points).await?;
    Ok(Json(response))
}

pub async fn remove_habit(
    State(state): State<AppState>,
    Json(payload): Json<NamePayload>,
) -> Result<Json<MutationResponse>, AppError> {
    let response = apply_habit_remove(&state, &payload.name).await?;
    Ok(Json(response))
}

pub async fn add_reward(
    State(state): State<AppState>,
    Json(payload): Json<RewardPayload>,
) -> Result<Json<MutationResponse>, AppError> {
    let response = apply_reward_add(&state, &payload.name, payload.cost).await?;
    Ok(Json(response))
}

pub async fn remove_reward(
    State(state): State<AppState>,
    Json(payload): Json<NamePayload>,
) -> Result<Json<MutationResponse>, AppError> {
    let response = apply_reward_remove(&state, &payload.name).await?;
    Ok(Json(response))
}

pub async fn check_in(
    State(state): State<AppState>,
    Json(payload): Json<CheckInPayload>,
) -> Result<Json<CheckInResponse>, AppError> {
    let date = today_string();
    let mut data = state.data.lock().await;
    match ops::check_in(&mut data, &date, &payload.habits) {
        ops::CheckInOutcome::Recorded { completed, awarded } => {
            persist_data(&state.data_path, &data).await?;
            Ok(Json(CheckInResponse {
                date,
                status: CheckInStatus::Recorded,
                completed,
                awarded,
                score: data.score,
            }))
        }
        ops::CheckInOutcome::NothingToDo => Ok(Json(CheckInResponse {
            date,
            status: CheckInStatus::NothingToDo,
            completed: Vec::new(),
            awarded: 0,
            score: data.score,
        })),
    }
}

pub async fn redeem(
    State(state): State<AppState>,
    Json(payload): Json<NamePayload>,
) -> Result<Json<RedeemResponse>, AppError> {
    let response = apply_redeem(&state, &payload.name).await?;
    Ok(Json(response))
}

pub async fn add_habit_form(
    State(state): State<AppState>,
    Form(payload): Form<HabitPayload>,
) -> Result<Redirect, AppError> {
    apply_habit_add(&state, &payload.name, payload.points).await?;
    Ok(Redirect::to("/"))
}

pub async fn remove_habit_form(
    State(state): State<AppState>,
    Form(payload): Form<NamePayload>,
) -> Result<Redirect, AppError> {
    apply_habit_remove(&state, &payload.name).await?;
    Ok(Redirect::to("/"))
}

pub async fn add_reward_form(
    State(state): State<AppState>,
    Form(payload): Form<RewardPayload>,
) -> Result<Redirect, AppError> {
    apply_reward_add(&state, &payload.name, payload.cost).await?;
    Ok(Redirect::to("/"))
}

pub async fn remove_reward_form(
    State(state): State<AppState>,
    Form(payload): Form<NamePayload>,
) -> Result<Redirect, AppError> {
    apply_reward_remove(&state, &payload.name).await?;
    Ok(Redirect::to("/"))
}

pub async fn redeem_form(
    State(state): State<AppState>,
    Form(payload): Form<NamePayload>,
) -> Result<Redirect, AppError> {
    apply_redeem(&state, &payload.name).await?;
    Ok(Redirect::to("/"))
}

async fn apply_habit_add(
    state: &AppState,
    name: &str,
    points: u32,
) -> Result<MutationResponse, AppError> {
    let mut data = state.data.lock().await;
    let changed = ops::add_habit(&mut data, name, points);
    if changed {
        persist_data(&state.data_path, &data).await?;
    }
    Ok(summary(changed, &data))
}

async fn apply_habit_remove(state: &AppState, name: &str) -> Result<MutationResponse, AppError> {
    let mut data = state.data.lock().await;
    let changed = ops::remove_habit(&mut data, name);
    if changed {
        persist_data(&state.data_path, &data).await?;
    }
    Ok(summary(changed, &data))
}

async fn apply_reward_add(
    state: &AppState,
    name: &str,
    cost: u32,
) -> Result<MutationResponse, AppError> {
    let mut data = state.data.lock().await;
    let changed = ops::add_reward(&mut data, name, cost);
    if changed {
        persist_data(&state.data_path, &data).await?;
    }
    Ok(summary(changed, &data))
}

async fn apply_reward_remove(state: &AppState, name: &str) -> Result<MutationResponse, AppError> {
    let mut data = state.data.lock().await;
    let changed = ops::remove_reward(&mut data, name);
    if changed {
        persist_data(&state.data_path, &data).await?;
    }
    Ok(summary(changed, &data))
}

async fn apply_redeem(state: &AppState, name: &str) -> Result<RedeemResponse, AppError> {
    let mut data = state.data.lock().await;
    match ops::redeem(&mut data, name) {
        Ok(ops::RedeemOutcome::Redeemed { cost, balance }) => {
            persist_data(&state.data_path, &data).await?;
            Ok(RedeemResponse {
                status: RedeemStatus::Redeemed,
                reward: name.to_string(),
                cost,
                score: balance,
            })
        }
        Ok(ops::RedeemOutcome::InsufficientScore { cost, balance }) => Ok(RedeemResponse {
            status: RedeemStatus::InsufficientScore,
            reward: name.to_string(),
            cost,
            score: balance,
        }),
        Err(err) => Err(AppError::not_found(err.to_string())),
    }
}

fn summary(changed: bool, data: &TrackerData) -> MutationResponse {
    MutationResponse {
        changed,
        score: data.score,
        habits: data.habits.clone(),
        rewards: data.rewards.clone(),
    }
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}
