use crate::models::TrackerData;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown reward: {0}")]
pub struct UnknownReward(pub String);

#[derive(Debug, PartialEq)]
pub enum CheckInOutcome {
    Recorded { completed: Vec<String>, awarded: i64 },
    NothingToDo,
}

#[derive(Debug, PartialEq)]
pub enum RedeemOutcome {
    Redeemed { cost: u32, balance: i64 },
    InsufficientScore { cost: u32, balance: i64 },
}

/// Inserts an empty completion list for `date` if none exists yet. Viewing a
/// day counts as an entry for that day, so calling this from a read-only page
/// load is a deliberate, visible side effect; the key reaches disk with the
/// next save.
pub fn ensure_day(data: &mut TrackerData, date: &str) -> bool {
    if data.checked.contains_key(date) {
        return false;
    }
    data.checked.insert(date.to_string(), Vec::new());
    true
}

/// Adds or overwrites a habit. An empty name is silently rejected.
pub fn add_habit(data: &mut TrackerData, name: &str, points: u32) -> bool {
    if name.is_empty() {
        return false;
    }
    data.habits.insert(name.to_string(), points);
    true
}

/// Removes a habit, leaving its historical `checked` entries in place as
/// orphaned references.
pub fn remove_habit(data: &mut TrackerData, name: &str) -> bool {
    data.habits.remove(name).is_some()
}

pub fn add_reward(data: &mut TrackerData, name: &str, cost: u32) -> bool {
    if name.is_empty() {
        return false;
    }
    data.rewards.insert(name.to_string(), cost);
    true
}

pub fn remove_reward(data: &mut TrackerData, name: &str) -> bool {
    data.rewards.remove(name).is_some()
}

/// Records the habits from `selected` that exist and are not yet completed on
/// `date`, in selection order, and awards their summed points. Names repeated
/// within one call count once; names not in `habits` are skipped. Returns
/// `NothingToDo` when nothing new was completable, in which case the caller
/// must not persist.
pub fn check_in(data: &mut TrackerData, date: &str, selected: &[String]) -> CheckInOutcome {
    let mut completed: Vec<String> = Vec::new();
    let mut awarded: i64 = 0;
    {
        let day = data.checked.entry(date.to_string()).or_default();
        for name in selected {
            if day.contains(name) || completed.contains(name) {
                continue;
            }
            if let Some(points) = data.habits.get(name) {
                awarded += i64::from(*points);
                completed.push(name.clone());
            }
        }
        day.extend(completed.iter().cloned());
    }
    if completed.is_empty() {
        return CheckInOutcome::NothingToDo;
    }
    data.score += awarded;
    CheckInOutcome::Recorded { completed, awarded }
}

/// Deducts the reward's cost when the balance covers it; otherwise reports
/// the shortfall without mutating. Unknown names are an error so direct API
/// callers get a clear signal.
pub fn redeem(data: &mut TrackerData, name: &str) -> Result<RedeemOutcome, UnknownReward> {
    let cost = *data
        .rewards
        .get(name)
        .ok_or_else(|| UnknownReward(name.to_string()))?;
    if data.score >= i64::from(cost) {
        data.score -= i64::from(cost);
        Ok(RedeemOutcome::Redeemed {
            cost,
            balance: data.score,
        })
    } else {
        Ok(RedeemOutcome::InsufficientScore {
            cost,
            balance: data.score,
        })
    }
}
