//! sqsd refuses to start on bad configuration

use crate::prelude::*;

const QUEUE: &str = "http://127.0.0.1:9/000000000000/jobs";
const WORKER: &str = "http://127.0.0.1:9/run";

#[test]
fn missing_queue_url_is_fatal() {
    daemon()
        .env("INVOKER_URL", WORKER)
        .fails()
        .code(1)
        .stderr_has("queue_url is required");
}

#[test]
fn unparsable_env_value_is_fatal() {
    daemon()
        .env("QUEUE_URL", QUEUE)
        .env("INVOKER_URL", WORKER)
        .env("INVOKER_PARALLEL_COUNT", "lots")
        .fails()
        .stderr_has("INVOKER_PARALLEL_COUNT");
}

#[test]
fn unknown_log_level_is_fatal() {
    daemon()
        .env("QUEUE_URL", QUEUE)
        .env("INVOKER_URL", WORKER)
        .env("LOG_LEVEL", "chatty")
        .fails()
        .stderr_has("unknown log level");
}

#[test]
fn visibility_shorter_than_invoker_timeout_is_fatal() {
    daemon()
        .env("QUEUE_URL", QUEUE)
        .env("INVOKER_URL", WORKER)
        .env("DEFAULT_INVOKER_TIMEOUT_SECONDS", "60")
        .env("VISIBILITY_TIMEOUT_SECONDS", "30")
        .fails()
        .stderr_has("visibility_timeout");
}

#[test]
fn missing_config_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sqsd.toml");
    daemon()
        .args(&["--config", path.to_str().unwrap()])
        .fails()
        .stderr_has("cannot read config file");
}

#[test]
fn config_file_with_unknown_key_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sqsd.toml");
    std::fs::write(&path, format!("queue_url = \"{QUEUE}\"\nqueue = \"jobs\"\n")).unwrap();
    daemon()
        .env("SQSD_CONFIG", path.to_str().unwrap())
        .fails()
        .stderr_has("invalid config file");
}
