//! An asynchronous random-number generator and the comprehension built on it.
//!
//! The generator yields `count` values, pausing `interval` before each one. The
//! pause is delegated to a caller-supplied sleep function, so the stream works
//! on any executor (`tokio::time::sleep`, `smol::Timer::after`, ...).

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use futures::FutureExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::timer::measure;

/// Number of comprehensions [`measure_runtime`] runs concurrently.
pub const MEASURE_RUNTIME_RUNS: usize = 4;

/// Shape of the generated sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Number of values to yield
    pub count: usize,
    /// Pause before each value
    pub interval: Duration,
    /// Inclusive lower bound of generated values
    pub low: f64,
    /// Exclusive upper bound of generated values
    pub high: f64,
    /// Fixed RNG seed for reproducible sequences; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 10,
            interval: Duration::from_secs(1),
            low: 0.0,
            high: 10.0,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Generate values in `[low, high)`. A range with `high <= low` yields `low`.
    ///
    /// Bounds are expected to be finite. A range whose width is not finite
    /// (an infinite bound, or `NaN`) also yields `low`.
    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn sample(&self, rng: &mut StdRng) -> f64 {
        let span = self.high - self.low;
        if !(span.is_finite() && span > 0.0) {
            return self.low;
        }
        self.low + rng.gen::<f64>() * span
    }
}

/// Yield `config.count` random values, awaiting `sleep(config.interval)` before each.
///
/// ```
/// # async {
/// use gatherx::{async_generator, GeneratorConfig};
/// use futures::StreamExt;
/// use std::time::Duration;
///
/// let config = GeneratorConfig::default().with_interval(Duration::from_millis(1));
/// let values: Vec<f64> = async_generator(config, tokio::time::sleep).collect().await;
/// assert_eq!(values.len(), 10);
/// # };
/// ```
pub fn async_generator<S, Fut>(config: GeneratorConfig, sleep: S) -> impl Stream<Item = f64>
where
    S: Fn(Duration) -> Fut,
    Fut: Future<Output = ()>,
{
    let rng = config.rng();

    stream::unfold(
        (0usize, rng, sleep),
        move |(emitted, mut rng, sleep)| async move {
            if emitted >= config.count {
                return None;
            }

            sleep(config.interval).await;
            let value = config.sample(&mut rng);

            #[cfg(feature = "tracing")]
            trace!(index = emitted, value, "generated value");

            Some((value, (emitted + 1, rng, sleep)))
        },
    )
}

/// Collect every value [`async_generator`] yields.
pub async fn async_comprehension<S, Fut>(config: GeneratorConfig, sleep: S) -> Vec<f64>
where
    S: Fn(Duration) -> Fut,
    Fut: Future<Output = ()>,
{
    let values: Vec<f64> = async_generator(config, sleep).collect().await;

    #[cfg(feature = "tracing")]
    debug!(count = values.len(), "comprehension collected");

    values
}

/// Time [`MEASURE_RUNTIME_RUNS`] concurrent comprehensions.
///
/// Because the comprehensions overlap, the result is close to
/// `config.count * config.interval` rather than four times that. The collected
/// values are discarded.
pub async fn measure_runtime<S, Fut>(config: GeneratorConfig, sleep: S) -> Duration
where
    S: Fn(Duration) -> Fut + Clone,
    Fut: Future<Output = ()>,
{
    measure(
        || async_comprehension(config, sleep.clone()).map(drop),
        MEASURE_RUNTIME_RUNS,
    )
    .await
}
