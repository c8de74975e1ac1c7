//! Common test utilities for integration tests.
//!
//! Tests run against the real router. Code execution is served by a small
//! in-process runner that understands one-line `console.log("...")` programs
//! and fails anything containing `throw`.

use std::time::Duration;

use axum::{routing::post, Json, Router};
use axum_test::TestServer;
use lesson_core::ExecutionOutcome;
use serde::Deserialize;

use lesson_backend::config::Config;
use lesson_backend::{router, AppState};

#[derive(Deserialize)]
struct ExecuteRequest {
    code: String,
    #[allow(dead_code)]
    language: String,
}

async fn execute(Json(req): Json<ExecuteRequest>) -> Json<ExecutionOutcome> {
    if req.code.contains("throw") {
        return Json(ExecutionOutcome::failed("Error: boom"));
    }
    let output: Vec<&str> = req
        .code
        .lines()
        .filter_map(|line| {
            line.trim()
                .strip_prefix("console.log(\"")?
                .strip_suffix("\");")
        })
        .collect();
    Json(ExecutionOutcome::succeeded(output.join("\n")))
}

/// Start the fake runner and return its base URL.
async fn spawn_runner() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake runner");
    let addr = listener.local_addr().expect("fake runner address");
    let app = Router::new().route("/execute", post(execute));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake runner");
    });
    format!("http://{}", addr)
}

fn config(executor_url: Option<String>) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        executor_url,
        executor_timeout: Duration::from_secs(5),
    }
}

/// Server backed by the fake runner.
pub async fn server() -> TestServer {
    let url = spawn_runner().await;
    TestServer::new(router(AppState::new(&config(Some(url))))).expect("test server")
}

/// Server with no runner configured.
pub fn server_without_runner() -> TestServer {
    TestServer::new(router(AppState::new(&config(None)))).expect("test server")
}

/// A lesson with one of each kind.
pub const LESSON: &str = r#"# Greetings

:::exercise
**Say hello**

Print the greeting.

```executable:javascript
console.log("");
```

:::solution
```javascript
console.log("Hello, world!");
```
:::
:::

:::quiz
Which keyword declares a constant?
- [ ] var
- [x] const
:::

:::fill-blank
The capital of France is **{Paris}**.
:::
"#;
