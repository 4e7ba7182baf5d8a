use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct QuestionDto {
    position: u32,
    scoring: String,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    scale: Vec<String>,
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
struct AssessmentResponse {
    total: u32,
    level: String,
}

#[derive(Debug, Deserialize)]
struct StreakResponse {
    current_streak: u32,
    longest_streak: u32,
}

#[derive(Debug, Deserialize)]
struct StreakStatusResponse {
    current_streak: u32,
    longest_streak: u32,
    lapsed: bool,
}

#[derive(Debug, Deserialize)]
struct DailyMoodPoint {
    date: String,
    entries: u32,
}

#[derive(Debug, Deserialize)]
struct MoodSummaryResponse {
    last_7_days: Vec<DailyMoodPoint>,
    weekly: Vec<serde_json::Value>,
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
    path.push(format!("mindease_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/questions")).send().await {
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
    let child = Command::new(env!("CARGO_BIN_EXE_mindease"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
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

fn canonical_answers(forward: &str, reverse: &str, informational: &str) -> Vec<serde_json::Value> {
    (1..=12)
        .map(|position| {
            let label = match position {
                4 | 5 | 7 | 8 | 12 => reverse,
                11 => informational,
                _ => forward,
            };
            serde_json::json!({ "position": position, "label": label })
        })
        .collect()
}

#[tokio::test]
async fn http_questions_lists_canonical_instrument() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response: QuestionsResponse = client
        .get(format!("{}/api/questions", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(response.scale.len(), 5);
    assert_eq!(response.scale[0], "Never");
    assert_eq!(response.scale[4], "Very Often");
    assert_eq!(response.questions.len(), 12);
    assert_eq!(response.questions[0].position, 1);
    assert_eq!(response.questions[3].scoring, "reverse");
    assert_eq!(response.questions[10].scoring, "informational");
}

#[tokio::test]
async fn http_submit_assessment_scores_minimum_as_low() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/assessment/submit", server.base_url))
        .json(&serde_json::json!({
            "user": "assess_low",
            "answers": canonical_answers("Never", "Very Often", "Very Often"),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let result: AssessmentResponse = response.json().await.unwrap();
    assert_eq!(result.total, 0);
    assert_eq!(result.level, "Low");
}

#[tokio::test]
async fn http_submit_assessment_scores_maximum_as_high() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/assessment/submit", server.base_url))
        .json(&serde_json::json!({
            "user": "assess_high",
            "answers": canonical_answers("Very Often", "Never", "Never"),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let result: AssessmentResponse = response.json().await.unwrap();
    assert_eq!(result.total, 44);
    assert_eq!(result.level, "High");

    let latest: AssessmentResponse = client
        .get(format!(
            "{}/api/assessment/latest?user=assess_high",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(latest.total, 44);

    let history: Vec<AssessmentResponse> = client
        .get(format!(
            "{}/api/assessment/history?user=assess_high",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn http_submit_assessment_rejects_unknown_label() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let mut answers = canonical_answers("Never", "Never", "Never");
    answers[0] = serde_json::json!({ "position": 1, "label": "Occasionally" });

    let response = client
        .post(format!("{}/api/assessment/submit", server.base_url))
        .json(&serde_json::json!({ "user": "assess_bad_label", "answers": answers }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn http_submit_assessment_rejects_missing_answer() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let mut answers = canonical_answers("Never", "Never", "Never");
    answers.remove(5);

    let response = client
        .post(format!("{}/api/assessment/submit", server.base_url))
        .json(&serde_json::json!({ "user": "assess_partial", "answers": answers }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let latest = client
        .get(format!(
            "{}/api/assessment/latest?user=assess_partial",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(latest.status().as_u16(), 404);
}

#[tokio::test]
async fn http_streak_increment_is_idempotent_within_a_day() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let first: StreakResponse = client
        .post(format!("{}/api/streaks/increment", server.base_url))
        .json(&serde_json::json!({ "user": "streak_user" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first.current_streak, 1);
    assert_eq!(first.longest_streak, 1);

    let second: StreakResponse = client
        .post(format!("{}/api/streaks/increment", server.base_url))
        .json(&serde_json::json!({ "user": "streak_user" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second.current_streak, first.current_streak);
    assert_eq!(second.longest_streak, first.longest_streak);

    let status: StreakStatusResponse = client
        .get(format!("{}/api/streaks?user=streak_user", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status.current_streak, 1);
    assert_eq!(status.longest_streak, 1);
    assert!(!status.lapsed);
}

#[tokio::test]
async fn http_streak_reset_clears_current() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let incremented: StreakResponse = client
        .post(format!("{}/api/streaks/increment", server.base_url))
        .json(&serde_json::json!({ "user": "streak_reset_user" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(incremented.current_streak, 1);

    let cleared: StreakResponse = client
        .post(format!("{}/api/streaks/reset", server.base_url))
        .json(&serde_json::json!({ "user": "streak_reset_user" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared.current_streak, 0);
    assert_eq!(cleared.longest_streak, 1);

    let status: StreakStatusResponse = client
        .get(format!(
            "{}/api/streaks?user=streak_reset_user",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status.current_streak, 0);
    assert!(!status.lapsed);
}

#[tokio::test]
async fn http_mood_log_feeds_stats() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/mood-logs", server.base_url))
        .json(&serde_json::json!({
            "user": "mood_user",
            "mood": "calm",
            "intensity": 7,
            "note": "after a walk",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let history: Vec<serde_json::Value> = client
        .get(format!("{}/api/mood-logs?user=mood_user", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 1);

    let stats: MoodSummaryResponse = client
        .get(format!(
            "{}/api/mood-logs/stats?user=mood_user",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.last_7_days.len(), 7);
    assert_eq!(stats.weekly.len(), 8);
    let logged: u32 = stats.last_7_days.iter().map(|point| point.entries).sum();
    assert_eq!(logged, 1);
    assert!(stats.last_7_days.iter().all(|point| !point.date.is_empty()));
}

#[tokio::test]
async fn http_mood_log_rejects_out_of_range_intensity() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/mood-logs", server.base_url))
        .json(&serde_json::json!({
            "user": "mood_user_invalid",
            "mood": "sad",
            "intensity": 11,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(format!("{}/api/mood-logs", server.base_url))
        .json(&serde_json::json!({
            "user": "mood_user_invalid",
            "mood": "joyful",
            "intensity": 5,
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
