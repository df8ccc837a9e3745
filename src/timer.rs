//! Wall-clock measurement of concurrent producer invocations.
//!
//! Every function here creates all `count` invocations before awaiting any of
//! them, so a producer with a fixed latency `L` measures close to `L` rather than
//! `count * L`.
//!
//! [`measure`] and [`try_measure`] drive the invocations on the calling task: one
//! cooperative scheduler, interleaving at suspension points. [`measure_spawned`]
//! hands each invocation to a caller-supplied spawner instead, which lets a
//! multi-threaded runtime run them in parallel.
//!
//! There is no timeout: if an invocation never completes, neither does the
//! measurement.

use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use futures::channel::mpsc;
use futures::future::{join_all, ready, BoxFuture, Either};
use futures::{FutureExt, StreamExt};

#[cfg(feature = "tracing")]
use tracing::{debug, error, info};

use crate::error::{panic_message, TimerError, TimerResult};

type Settled<T, E> = Result<Result<T, E>, Box<dyn Any + Send>>;

/// Outcome of a successful measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement<T> {
    elapsed: Duration,
    outputs: Vec<T>,
}

impl<T> Measurement<T> {
    /// Wall-clock time from just before the first invocation was created to just
    /// after the last one completed.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Producer outputs in invocation order (not completion order).
    pub fn outputs(&self) -> &[T] {
        &self.outputs
    }

    pub fn into_outputs(self) -> Vec<T> {
        self.outputs
    }

    pub fn count(&self) -> usize {
        self.outputs.len()
    }
}

/// Run `count` invocations of `producer` concurrently and return the elapsed time.
///
/// Invocations must produce `()`. A producer that can fail goes through
/// [`try_measure`], which reports the failure instead of dropping it. A
/// panicking invocation propagates its panic.
///
/// # Examples
///
/// ```
/// # async {
/// use std::time::Duration;
///
/// let elapsed = gatherx::measure(|| tokio::time::sleep(Duration::from_millis(50)), 4).await;
///
/// assert!(elapsed >= Duration::from_millis(50));
/// assert!(elapsed < Duration::from_millis(200));
/// # };
/// ```
///
/// Fallible producers are rejected at compile time:
///
/// ```compile_fail
/// # async {
/// let elapsed = gatherx::measure(|| async { Err::<(), &str>("unreachable host") }, 4).await;
/// # };
/// ```
#[cfg_attr(feature = "tracing", tracing::instrument(skip(producer)))]
pub async fn measure<P, F>(mut producer: P, count: usize) -> Duration
where
    P: FnMut() -> F,
    F: Future<Output = ()>,
{
    #[cfg(feature = "tracing")]
    info!("starting measurement");

    let start = Instant::now();
    let invocations: Vec<F> = (0..count).map(|_| producer()).collect();
    join_all(invocations).await;
    let elapsed = start.elapsed();

    #[cfg(feature = "tracing")]
    info!(elapsed_ms = elapsed.as_millis() as u64, "measurement completed");

    elapsed
}

/// Run `count` invocations of a fallible `producer` concurrently.
///
/// All invocations are awaited even when some fail.
///
/// # Errors
///
/// Returns the failure of the lowest-indexed invocation that failed:
/// [`TimerError::ProducerFailed`] for an `Err` output and
/// [`TimerError::ProducerPanicked`] for a panic, whether the panic happens in
/// the producer call itself or while the invocation runs.
///
/// # Examples
///
/// ```
/// # async {
/// use gatherx::TimerError;
///
/// let mut next = 0;
/// let result = gatherx::try_measure(
///     || {
///         next += 1;
///         let n = next;
///         async move { if n == 3 { Err("no third value") } else { Ok(n) } }
///     },
///     4,
/// )
/// .await;
///
/// assert_eq!(
///     result.unwrap_err(),
///     TimerError::ProducerFailed { index: 2, source: "no third value" }
/// );
/// # };
/// ```
#[cfg_attr(feature = "tracing", tracing::instrument(skip(producer)))]
pub async fn try_measure<P, F, T, E>(mut producer: P, count: usize) -> TimerResult<Measurement<T>, E>
where
    P: FnMut() -> F,
    F: Future<Output = Result<T, E>>,
{
    #[cfg(feature = "tracing")]
    info!("starting measurement");

    let start = Instant::now();
    let invocations: Vec<_> = (0..count)
        .map(|_| match catch_unwind(AssertUnwindSafe(&mut producer)) {
            Ok(invocation) => Either::Left(AssertUnwindSafe(invocation).catch_unwind()),
            Err(payload) => Either::Right(ready(Err(payload))),
        })
        .collect();
    let settled = join_all(invocations).await;
    let elapsed = start.elapsed();

    settle(settled.into_iter().map(Some), elapsed)
}

/// Like [`try_measure`], but each invocation is handed to `spawner`.
///
/// The spawner receives a boxed `'static` future and is responsible for driving
/// it, for example:
/// - Tokio: `|fut| { tokio::spawn(fut); }`
/// - Smol: `|fut| smol::spawn(fut).detach()`
///
/// # Errors
///
/// Same as [`try_measure`], plus [`TimerError::Abandoned`] when the spawner drops
/// an invocation without running it to completion.
///
/// # Examples
///
/// ```
/// # async {
/// use std::time::Duration;
///
/// let measurement = gatherx::measure_spawned(
///     |fut| { tokio::spawn(fut); },
///     || async {
///         tokio::time::sleep(Duration::from_millis(50)).await;
///         Ok::<_, std::convert::Infallible>(1)
///     },
///     4,
/// )
/// .await
/// .unwrap();
///
/// assert_eq!(measurement.outputs(), &[1, 1, 1, 1]);
/// # };
/// ```
#[cfg_attr(feature = "tracing", tracing::instrument(skip(spawner, producer)))]
pub async fn measure_spawned<S, P, F, T, E>(
    spawner: S,
    mut producer: P,
    count: usize,
) -> TimerResult<Measurement<T>, E>
where
    S: Fn(BoxFuture<'static, ()>),
    P: FnMut() -> F,
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    #[cfg(feature = "tracing")]
    info!("starting spawned measurement");

    let start = Instant::now();
    let (output_tx, mut output_rx) = mpsc::unbounded::<(usize, Settled<T, E>)>();
    let mut slots: Vec<Option<Settled<T, E>>> = (0..count).map(|_| None).collect();

    for index in 0..count {
        let invocation = match catch_unwind(AssertUnwindSafe(&mut producer)) {
            Ok(invocation) => AssertUnwindSafe(invocation).catch_unwind(),
            Err(payload) => {
                // Nothing to spawn; the slot settles now
                slots[index] = Some(Err(payload));
                continue;
            }
        };
        let out_tx = output_tx.clone();

        #[cfg(feature = "tracing")]
        debug!(index, "spawning invocation");

        spawner(Box::pin(async move {
            let result = invocation.await;
            // Ignore send errors - receiver may be dropped
            let _ = out_tx.unbounded_send((index, result));
        }));
    }

    // Drop the original sender so the channel closes once every invocation reports
    drop(output_tx);

    while let Some((index, result)) = output_rx.next().await {
        slots[index] = Some(result);
    }
    let elapsed = start.elapsed();

    settle(slots, elapsed)
}

/// Turn per-invocation results (in index order) into a measurement or the
/// lowest-index failure. `None` marks an invocation that never reported back.
fn settle<T, E>(
    slots: impl IntoIterator<Item = Option<Settled<T, E>>>,
    elapsed: Duration,
) -> TimerResult<Measurement<T>, E> {
    let mut outputs = Vec::new();

    for (index, slot) in slots.into_iter().enumerate() {
        let err = match slot {
            Some(Ok(Ok(output))) => {
                outputs.push(output);
                continue;
            }
            Some(Ok(Err(source))) => TimerError::ProducerFailed { index, source },
            Some(Err(payload)) => TimerError::ProducerPanicked {
                index,
                panic_message: panic_message(&*payload),
            },
            None => TimerError::Abandoned { index },
        };

        #[cfg(feature = "tracing")]
        error!(index, "producer invocation failed");

        return Err(err);
    }

    #[cfg(feature = "tracing")]
    info!(
        elapsed_ms = elapsed.as_millis() as u64,
        invocations = outputs.len(),
        "measurement completed"
    );

    Ok(Measurement { elapsed, outputs })
}
