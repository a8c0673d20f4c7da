use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The whole persisted document. Field defaults let files written before a
/// field existed (e.g. no `checked` map yet) still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrackerData {
    pub habits: BTreeMap<String, u32>,
    pub rewards: BTreeMap<String, u32>,
    pub score: i64,
    pub checked: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct HabitPayload {
    pub name: String,
    pub points: u32,
}

#[derive(Debug, Deserialize)]
pub struct RewardPayload {
    pub name: String,
    pub cost: u32,
}

#[derive(Debug, Deserialize)]
pub struct NamePayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckInPayload {
    pub habits: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TodayHabit {
    pub name: String,
    pub points: u32,
    pub checked: bool,
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: String,
    pub score: i64,
    pub habits: Vec<TodayHabit>,
}

/// Returned by the add/remove endpoints. `changed` is false for the silent
/// no-ops (empty name, removing an absent name).
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub changed: bool,
    pub score: i64,
    pub habits: BTreeMap<String, u32>,
    pub rewards: BTreeMap<String, u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStatus {
    Recorded,
    NothingToDo,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub date: String,
    pub status: CheckInStatus,
    pub completed: Vec<String>,
    pub awarded: i64,
    pub score: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedeemStatus {
    Redeemed,
    InsufficientScore,
}

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub status: RedeemStatus,
    pub reward: String,
    pub cost: u32,
    pub score: i64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub habit_totals: BTreeMap<String, u64>,
    pub daily_scores: BTreeMap<String, i64>,
    pub completion_rates: BTreeMap<String, f64>,
    pub months: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub month: String,
    pub days: BTreeMap<String, Vec<String>>,
}
