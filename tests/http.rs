use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct TodayHabit {
    name: String,
    points: u32,
    checked: bool,
}

#[derive(Debug, Deserialize)]
struct TodayResponse {
    date: String,
    score: i64,
    habits: Vec<TodayHabit>,
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    changed: bool,
    habits: BTreeMap<String, u32>,
    rewards: BTreeMap<String, u32>,
}

#[derive(Debug, Deserialize)]
struct CheckInResponse {
    status: String,
    completed: Vec<String>,
    awarded: i64,
    score: i64,
}

#[derive(Debug, Deserialize)]
struct RedeemResponse {
    status: String,
    cost: u32,
    score: i64,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    habit_totals: BTreeMap<String, u64>,
    daily_scores: BTreeMap<String, i64>,
    completion_rates: BTreeMap<String, f64>,
    months: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    days: BTreeMap<String, Vec<String>>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "habit_tracker_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

// The server is shared across tests, so every test uses its own habit and
// reward names.
fn unique_name(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/today")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_tracker"))
        .env("PORT", port.to_string())
        .env("HABIT_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_today(client: &Client, base_url: &str) -> TodayResponse {
    client
        .get(format!("{base_url}/api/today"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn get_stats(client: &Client, base_url: &str) -> StatsResponse {
    client
        .get(format!("{base_url}/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn add_habit(client: &Client, base_url: &str, name: &str, points: u32) -> MutationResponse {
    client
        .post(format!("{base_url}/api/habits"))
        .json(&serde_json::json!({ "name": name, "points": points }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn check_in(client: &Client, base_url: &str, habits: &[&str]) -> CheckInResponse {
    client
        .post(format!("{base_url}/api/checkin"))
        .json(&serde_json::json!({ "habits": habits }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_check_in_awards_points_once() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = unique_name("read");
    let added = add_habit(&client, &server.base_url, &habit, 5).await;
    assert!(added.changed);
    assert_eq!(added.habits.get(&habit), Some(&5));

    let before = get_today(&client, &server.base_url).await;
    let entry = before
        .habits
        .iter()
        .find(|item| item.name == habit)
        .expect("habit missing from today view");
    assert_eq!(entry.points, 5);
    assert!(!entry.checked);

    let response = check_in(&client, &server.base_url, &[&habit]).await;
    assert_eq!(response.status, "recorded");
    assert_eq!(response.completed, vec![habit.clone()]);
    assert_eq!(response.awarded, 5);
    assert_eq!(response.score, before.score + 5);

    let after = get_today(&client, &server.base_url).await;
    assert_eq!(after.score, before.score + 5);
    let entry = after
        .habits
        .iter()
        .find(|item| item.name == habit)
        .unwrap();
    assert!(entry.checked);

    // Checking in again the same day changes nothing.
    let repeat = check_in(&client, &server.base_url, &[&habit]).await;
    assert_eq!(repeat.status, "nothing_to_do");
    assert_eq!(repeat.awarded, 0);
    assert_eq!(repeat.score, before.score + 5);
}

#[tokio::test]
async fn http_empty_habit_name_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = add_habit(&client, &server.base_url, "", 3).await;
    assert!(!response.changed);
    assert!(!response.habits.contains_key(""));
}

#[tokio::test]
async fn http_redeem_checks_balance() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    // A reward nobody can afford.
    let unreachable = unique_name("yacht");
    let added: MutationResponse = client
        .post(format!("{}/api/rewards", server.base_url))
        .json(&serde_json::json!({ "name": unreachable, "cost": 1_000_000 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(added.changed);
    assert_eq!(added.rewards.get(&unreachable), Some(&1_000_000));

    let before = get_today(&client, &server.base_url).await;
    let refused: RedeemResponse = client
        .post(format!("{}/api/redeem", server.base_url))
        .json(&serde_json::json!({ "name": unreachable }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(refused.status, "insufficient_score");
    assert_eq!(refused.cost, 1_000_000);
    assert_eq!(refused.score, before.score);

    // Earn exactly enough for a small reward, then spend it.
    let habit = unique_name("run");
    add_habit(&client, &server.base_url, &habit, 7).await;
    let earned = check_in(&client, &server.base_url, &[&habit]).await;
    assert_eq!(earned.status, "recorded");

    let coffee = unique_name("coffee");
    let response = client
        .post(format!("{}/api/rewards", server.base_url))
        .json(&serde_json::json!({ "name": coffee, "cost": 7 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let redeemed: RedeemResponse = client
        .post(format!("{}/api/redeem", server.base_url))
        .json(&serde_json::json!({ "name": coffee }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(redeemed.status, "redeemed");
    assert_eq!(redeemed.cost, 7);
    assert_eq!(redeemed.score, earned.score - 7);
}

#[tokio::test]
async fn http_unknown_reward_is_404() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/redeem", server.base_url))
        .json(&serde_json::json!({ "name": unique_name("ghost") }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_stats_track_habit_removal() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = unique_name("stretch");
    add_habit(&client, &server.base_url, &habit, 4).await;
    let today = get_today(&client, &server.base_url).await;
    check_in(&client, &server.base_url, &[&habit]).await;

    let stats = get_stats(&client, &server.base_url).await;
    assert_eq!(stats.habit_totals.get(&habit), Some(&1));
    // All test traffic happens on a single day, so a habit completed today
    // has a 100% completion rate.
    assert_eq!(stats.completion_rates.get(&habit), Some(&100.0));
    let day_score = stats.daily_scores[&today.date];
    assert_eq!(stats.months, vec![today.date[..7].to_string()]);

    let calendar: CalendarResponse = client
        .get(format!(
            "{}/api/calendar/{}",
            server.base_url,
            &today.date[..7]
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(calendar.days[&today.date].contains(&habit));

    // Deleting the habit drops it from totals and zeroes its past points,
    // but its name stays in the day's record.
    let removed: MutationResponse = client
        .post(format!("{}/api/habits/remove", server.base_url))
        .json(&serde_json::json!({ "name": habit }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(removed.changed);

    let stats = get_stats(&client, &server.base_url).await;
    assert!(!stats.habit_totals.contains_key(&habit));
    assert_eq!(stats.daily_scores[&today.date], day_score - 4);

    let calendar: CalendarResponse = client
        .get(format!(
            "{}/api/calendar/{}",
            server.base_url,
            &today.date[..7]
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(calendar.days[&today.date].contains(&habit));
}

#[tokio::test]
async fn http_non_ascii_names_survive() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = unique_name("晨跑");
    let added = add_habit(&client, &server.base_url, &habit, 2).await;
    assert!(added.changed);

    let today = get_today(&client, &server.base_url).await;
    assert!(today.habits.iter().any(|item| item.name == habit));
    assert!(!today.date.is_empty());
}

#[tokio::test]
async fn http_corrupt_data_file_aborts_startup() {
    let _guard = TEST_LOCK.lock().await;
    let port = pick_free_port();
    let data_path = unique_data_path();
    std::fs::write(&data_path, b"{ this is not json").unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_habit_tracker"))
        .env("PORT", port.to_string())
        .env("HABIT_DATA_PATH", &data_path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn server");

    let deadline = Instant::now() + Duration::from_secs(5);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            let _ = child.wait();
            panic!("server kept running on a corrupt data file");
        }
        sleep(Duration::from_millis(50)).await;
    };
    assert!(!status.success());
}
