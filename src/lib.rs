//! Concurrent Runtime Measurement and Small Data Utilities
//!
//! gatherx measures how long it takes to run several asynchronous producers
//! *concurrently*, and ships the small utilities its test suite grew up around:
//! nested JSON access, JSON retrieval through an injected HTTP capability, and
//! per-instance memoization.
//!
//! # Features
//!
//! - **Concurrent timing**: [`measure`], [`try_measure`] and [`measure_spawned`] create
//!   every invocation before awaiting any, so a producer with latency `L` measures
//!   close to `L`, not `count × L`.
//! - **Runtime-agnostic**: the single-task variants run on whatever executor polls
//!   them; [`measure_spawned`] takes a spawner (Tokio, smol, a thread pool, ...).
//! - **Predictable failures**: every invocation finishes before the lowest-indexed
//!   failure (error or panic) is reported.
//! - **Nested access**: [`access`] walks a [`KeyPath`] through a [`NestedMap`] and names
//!   the first key it could not resolve.
//! - **Testable HTTP**: [`get_json`] goes through the [`HttpClient`] trait, so tests
//!   inject a double instead of patching globals.
//! - **Memoization**: [`Memo<T>`] is a per-instance lazy field; the computation runs
//!   at most once per owner.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # async {
//! // Four 100ms sleeps, run concurrently
//! let elapsed = gatherx::measure(|| tokio::time::sleep(Duration::from_millis(100)), 4).await;
//! assert!(elapsed < Duration::from_millis(400));
//!
//! // Four concurrent comprehensions over 10-value generators
//! let elapsed = gatherx::measure_runtime(
//!     gatherx::GeneratorConfig::default(),
//!     tokio::time::sleep,
//! )
//! .await;
//! println!("took {:.2}s", elapsed.as_secs_f64()); // ~10s, not ~40s
//! # };
//! ```
//!
//! # Nested Access
//!
//! ```
//! use gatherx::{access, AccessError};
//! use serde_json::json;
//!
//! let map = json!({"a": {"b": 2}});
//!
//! assert_eq!(access(&map, &["a", "b"]).unwrap(), &json!(2));
//! assert!(matches!(
//!     access(&json!({}), &["a"]),
//!     Err(AccessError::MissingKey { .. })
//! ));
//! ```
//!
//! # Fetching JSON
//!
//! With the default `reqwest` feature, [`ReqwestClient`] is a blocking
//! implementation of [`HttpClient`]:
//!
//! ```no_run
//! # #[cfg(feature = "reqwest")]
//! # {
//! use gatherx::{get_json, ReqwestClient};
//!
//! let client = ReqwestClient::new();
//! let org = get_json(&client, "https://api.github.com/orgs/google").unwrap();
//! # }
//! ```
//!
//! `get_json` never caches; each call is one GET.
//!
//! # Optional Tracing Support
//!
//! gatherx provides optional observability through the `tracing` crate. The
//! instrumentation is conditionally compiled and absent unless the `tracing`
//! feature is enabled:
//!
//! ```toml
//! [dependencies]
//! gatherx = { version = "0.1", features = ["tracing"] }
//! tracing-subscriber = "0.3"
//! ```
//!
//! ## Log Levels
//!
//! - **INFO**: measurement start/completion with elapsed time
//! - **DEBUG**: fetched URLs, memo initialization, spawned invocations
//! - **TRACE**: individual key resolution and generated values
//! - **ERROR**: failed or panicked producer invocations
//!
//! ```bash
//! RUST_LOG=gatherx=info  cargo test --features tracing
//! RUST_LOG=gatherx=trace cargo test --features tracing
//! ```

mod error;
mod fetch;
mod generator;
mod memo;
mod nested;
mod timer;

// Public re-exports
pub use error::{AccessError, AccessResult, TimerError, TimerResult};
#[cfg(feature = "reqwest")]
pub use fetch::ReqwestClient;
pub use fetch::{get_json, HttpClient};
pub use generator::{
    async_comprehension, async_generator, measure_runtime, GeneratorConfig, MEASURE_RUNTIME_RUNS,
};
pub use memo::Memo;
pub use nested::{access, access_as, access_mut, KeyPath, NestedMap};
pub use timer::{measure, measure_spawned, try_measure, Measurement};
