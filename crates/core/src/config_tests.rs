// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn valid() -> PipelineConfig {
    PipelineConfig::new(
        "http://localhost:9324/000000000000/jobs",
        "http://localhost:8080/run",
    )
}

#[test]
fn defaults_are_valid() {
    let config = valid();
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(config.visibility_timeout, Duration::from_secs(70));
    assert_eq!(config.content_type, "application/json");
    assert_eq!(config.drain_poll_interval, Duration::from_millis(100));
    assert_eq!(config.drain_timeout, None);
}

#[test]
fn invoker_timeout_rederives_visibility() {
    let config = valid().with_invoker_timeout(Duration::from_secs(1));
    assert_eq!(config.visibility_timeout, Duration::from_secs(11));
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn visibility_one_second_short_is_rejected() {
    let mut config = valid().with_invoker_timeout(Duration::from_secs(30));
    config.visibility_timeout = Duration::from_secs(39);
    assert_eq!(
        config.validate(),
        Err(ConfigError::VisibilityTooShort {
            visibility: Duration::from_secs(39),
            invoker: Duration::from_secs(30),
            margin: VISIBILITY_SAFETY_MARGIN,
        })
    );
}

#[test]
fn visibility_over_twelve_hours_is_rejected() {
    let mut config = valid();
    config.visibility_timeout = MAX_VISIBILITY_TIMEOUT + Duration::from_secs(1);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::VisibilityTooLong { .. })
    ));
}

#[yare::parameterized(
    empty     = { "",                     ConfigError::Missing { field: "queue_url" } },
    blank     = { "   ",                  ConfigError::Missing { field: "queue_url" } },
    no_scheme = { "localhost:9324/q",     ConfigError::NotHttpUrl { field: "queue_url", value: "localhost:9324/q".into() } },
    sqs_arn   = { "arn:aws:sqs:q",        ConfigError::NotHttpUrl { field: "queue_url", value: "arn:aws:sqs:q".into() } },
    no_host   = { "https://",             ConfigError::NotHttpUrl { field: "queue_url", value: "https://".into() } },
)]
fn bad_queue_url(url: &str, expected: ConfigError) {
    let mut config = valid();
    config.queue_url = url.to_string();
    assert_eq!(config.validate(), Err(expected));
}

#[test]
fn bad_invoker_url() {
    let mut config = valid();
    config.invoker_url = "ftp://worker".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotHttpUrl { field: "invoker_url", .. })
    ));
}

#[yare::parameterized(
    fetcher    = { "fetcher_parallel" },
    dispatcher = { "dispatcher_parallel" },
    remover    = { "remover_parallel" },
)]
fn zero_parallelism(field: &'static str) {
    let mut config = valid();
    match field {
        "fetcher_parallel" => config.fetcher_parallel = 0,
        "dispatcher_parallel" => config.dispatcher_parallel = 0,
        _ => config.remover_parallel = 0,
    }
    assert_eq!(
        config.validate(),
        Err(ConfigError::ZeroParallelism { field })
    );
}

#[yare::parameterized(
    zero   = { 0,  false },
    one    = { 1,  true },
    ten    = { 10, true },
    eleven = { 11, false },
)]
fn batch_size_bounds(max_messages: u32, ok: bool) {
    let mut config = valid();
    config.max_messages = max_messages;
    assert_eq!(config.validate().is_ok(), ok);
}

#[test]
fn wait_time_over_twenty_seconds_is_rejected() {
    let mut config = valid();
    config.wait_time = Duration::from_secs(21);
    assert!(matches!(config.validate(), Err(ConfigError::WaitTime { .. })));
    config.wait_time = Duration::ZERO;
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn zero_invoker_timeout_is_rejected() {
    let mut config = valid();
    config.invoker_timeout = Duration::ZERO;
    assert_eq!(config.validate(), Err(ConfigError::ZeroInvokerTimeout));
}

#[yare::parameterized(
    max_u64      = { Duration::from_secs(u64::MAX) },
    max_duration = { Duration::MAX },
    just_over    = { MAX_VISIBILITY_TIMEOUT - VISIBILITY_SAFETY_MARGIN + Duration::from_secs(1) },
)]
fn huge_invoker_timeout_is_rejected(timeout: Duration) {
    let config = valid().with_invoker_timeout(timeout);
    assert_eq!(
        config.validate(),
        Err(ConfigError::InvokerTimeoutTooLong {
            got: timeout,
            max: MAX_VISIBILITY_TIMEOUT - VISIBILITY_SAFETY_MARGIN,
        })
    );
}

#[test]
fn longest_invoker_timeout_fills_max_visibility() {
    let config = valid().with_invoker_timeout(MAX_VISIBILITY_TIMEOUT - VISIBILITY_SAFETY_MARGIN);
    assert_eq!(config.visibility_timeout, MAX_VISIBILITY_TIMEOUT);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn zero_wait_without_idle_sleep_is_rejected() {
    let mut config = valid();
    assert_eq!(config.idle_sleep, DEFAULT_IDLE_SLEEP);
    config.wait_time = Duration::ZERO;
    config.idle_sleep = Duration::ZERO;
    assert_eq!(config.validate(), Err(ConfigError::BusyPoll));

    config.wait_time = Duration::from_secs(1);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn zero_drain_poll_is_rejected() {
    let mut config = valid();
    config.drain_poll_interval = Duration::ZERO;
    assert_eq!(config.validate(), Err(ConfigError::ZeroDrainPoll));
}

proptest! {
    #[test]
    fn visibility_safety_holds_for_any_timeouts(
        invoker_ms in 1u64..3_600_000,
        visibility_ms in 0u64..3_700_000,
    ) {
        let mut config = valid().with_invoker_timeout(Duration::from_millis(invoker_ms));
        config.visibility_timeout = Duration::from_millis(visibility_ms);
        let accepted = config.validate().is_ok();
        let safe = visibility_ms >= invoker_ms + 10_000;
        prop_assert_eq!(accepted, safe);
    }
}
