//! Tests for how producer failures surface from a measurement

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gatherx::{measure_spawned, try_measure, TimerError};
use tokio::time::sleep;

#[derive(Debug, Clone, PartialEq)]
struct FetchFailed(usize);

impl std::fmt::Display for FetchFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fetch {} failed", self.0)
    }
}

impl std::error::Error for FetchFailed {}

#[tokio::test]
async fn test_slow_invocations_finish_before_fast_failure_is_reported() {
    let completed = Arc::new(AtomicUsize::new(0));
    let mut index = 0;

    let result = try_measure(
        || {
            let i = index;
            index += 1;
            let completed = Arc::clone(&completed);
            async move {
                if i == 0 {
                    return Err(FetchFailed(i));
                }
                sleep(Duration::from_millis(50)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                Ok(i)
            }
        },
        4,
    )
    .await;

    assert_eq!(
        result,
        Err(TimerError::ProducerFailed {
            index: 0,
            source: FetchFailed(0)
        })
    );
    assert_eq!(completed.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_lowest_index_wins_over_completion_order() {
    let mut index = 0;

    let result = try_measure(
        || {
            let i = index;
            index += 1;
            async move {
                // Invocation 3 fails first, invocation 1 fails last
                let delay = if i == 1 { 80 } else { 10 };
                sleep(Duration::from_millis(delay)).await;
                if i == 1 || i == 3 {
                    Err(FetchFailed(i))
                } else {
                    Ok(i)
                }
            }
        },
        4,
    )
    .await;

    assert_eq!(result.unwrap_err().index(), 1);
}

#[tokio::test]
async fn test_panic_and_error_mixed() {
    let mut index = 0;

    let result = try_measure(
        || {
            let i = index;
            index += 1;
            async move {
                match i {
                    0 => Ok(0),
                    1 => panic!("invocation {} panicked", i),
                    _ => Err(FetchFailed(i)),
                }
            }
        },
        3,
    )
    .await;

    match result {
        Err(TimerError::ProducerPanicked {
            index,
            panic_message,
        }) => {
            assert_eq!(index, 1);
            assert_eq!(panic_message, "invocation 1 panicked");
        }
        other => panic!("expected a panic report, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_source_is_producer_error() {
    let result = try_measure(|| async { Err::<(), _>(FetchFailed(0)) }, 1).await;

    let err = result.unwrap_err();
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "fetch 0 failed");
    assert!(err.to_string().contains("#0 failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_spawned_failure_waits_for_all() {
    let completed = Arc::new(AtomicUsize::new(0));
    let mut index = 0;

    let result = measure_spawned(
        |fut| {
            tokio::spawn(fut);
        },
        || {
            let i = index;
            index += 1;
            let completed = Arc::clone(&completed);
            async move {
                sleep(Duration::from_millis(if i == 2 { 5 } else { 40 })).await;
                completed.fetch_add(1, Ordering::SeqCst);
                if i == 2 {
                    Err(FetchFailed(i))
                } else {
                    Ok(i)
                }
            }
        },
        4,
    )
    .await;

    assert_eq!(result.unwrap_err().index(), 2);
    assert_eq!(completed.load(Ordering::SeqCst), 4);
}
