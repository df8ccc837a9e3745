//! Proof that invocations overlap instead of running back to back

use std::time::Duration;

use gatherx::{measure, try_measure};
use tokio::time::sleep;

use crate::common::sleeper;

#[tokio::test]
async fn test_measure_four_sleepers() {
    let latency = Duration::from_millis(200);

    let elapsed = measure(sleeper(latency), 4).await;

    println!(
        "4 invocations × {}ms completed in {:?} (sequential would be {:?})",
        latency.as_millis(),
        elapsed,
        latency * 4
    );

    assert!(elapsed >= latency);
    assert!(
        elapsed < latency * 4,
        "Invocations appear to be running sequentially! Took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_parallelism_proof_1000_invocations() {
    // 1000 invocations sleeping 100ms each complete in ~100ms (not 100 seconds)
    let latency = Duration::from_millis(100);
    let count = 1000u32;

    let measurement = try_measure(
        || async move {
            sleep(latency).await;
            Ok::<_, std::convert::Infallible>(())
        },
        count as usize,
    )
    .await
    .unwrap();

    let sequential_time = latency * count;
    let elapsed = measurement.elapsed();

    println!(
        "Parallelism proof: {} invocations × {}ms completed in {:?} (sequential would be {:?})",
        count,
        latency.as_millis(),
        elapsed,
        sequential_time
    );

    // Allow generous overhead: should complete in well under a second
    assert!(
        elapsed < Duration::from_millis(1000),
        "Invocations appear to be running sequentially! Took {:?} instead of ~100ms",
        elapsed
    );

    let speedup = sequential_time.as_secs_f64() / elapsed.as_secs_f64();
    assert!(
        speedup > 100.0,
        "Speedup too low: {:.1}x (expected > 100x)",
        speedup
    );
    assert_eq!(measurement.count(), count as usize);
}

#[tokio::test]
async fn test_mixed_latencies_bounded_by_slowest() {
    let latencies = [10u64, 50, 150, 30];
    let mut next = latencies.iter().copied();

    let elapsed = measure(
        || {
            let ms = next.next().unwrap_or(0);
            sleep(Duration::from_millis(ms))
        },
        latencies.len(),
    )
    .await;

    let slowest = Duration::from_millis(150);
    let total: u64 = latencies.iter().sum();

    assert!(elapsed >= slowest);
    assert!(elapsed < Duration::from_millis(total));
}

#[tokio::test]
async fn test_elapsed_reported_as_float_seconds() {
    let latency = Duration::from_millis(50);

    let measurement = try_measure(
        || async move {
            sleep(latency).await;
            Ok::<_, String>(())
        },
        4,
    )
    .await
    .unwrap();

    let seconds = measurement.as_secs_f64();
    assert!(seconds >= 0.05);
    assert!(seconds < 0.2);
}
