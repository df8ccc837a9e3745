//! Per-instance memoization.
//!
//! A [`Memo<T>`] is a field on the owning struct. The accessor method that wraps
//! the computation calls [`Memo::get_or_init`], so the computation runs on the
//! first access and never again for that instance:
//!
//! ```
//! use gatherx::Memo;
//!
//! struct Org {
//!     login: String,
//!     greeting: Memo<String>,
//! }
//!
//! impl Org {
//!     fn greeting(&self) -> &str {
//!         self.greeting.get_or_init(|| format!("hello, {}", self.login))
//!     }
//! }
//!
//! let org = Org { login: "google".into(), greeting: Memo::new() };
//! assert_eq!(org.greeting(), "hello, google");
//! assert!(org.greeting.is_computed());
//! ```
//!
//! The cell is single-threaded (`!Sync`): two threads can never race on the
//! first access because a `&Memo<T>` cannot be shared across threads.

use std::fmt;

use once_cell::unsync::OnceCell;

#[cfg(feature = "tracing")]
use tracing::debug;

/// A lazily computed value owned by a single instance.
pub struct Memo<T> {
    cell: OnceCell<T>,
}

impl<T> Memo<T> {
    /// Create an empty memo; nothing is computed until first access.
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the cached value, computing it with `f` on first access.
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(|| {
            #[cfg(feature = "tracing")]
            debug!(value_type = std::any::type_name::<T>(), "computing memoized value");

            f()
        })
    }

    /// Like [`Memo::get_or_init`] for fallible computations.
    ///
    /// # Errors
    ///
    /// Returns the error from `f` unchanged. Nothing is cached in that case, so the
    /// next access runs `f` again.
    pub fn get_or_try_init<F, E>(&self, f: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.cell.get_or_try_init(|| {
            #[cfg(feature = "tracing")]
            debug!(value_type = std::any::type_name::<T>(), "computing memoized value");

            f()
        })
    }

    /// The cached value, if it has been computed.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Remove and return the cached value; the next access recomputes.
    pub fn take(&mut self) -> Option<T> {
        self.cell.take()
    }

    /// Drop the cached value; the next access recomputes.
    pub fn reset(&mut self) {
        self.cell = OnceCell::new();
    }

    pub fn into_inner(self) -> Option<T> {
        self.cell.into_inner()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<uncomputed>)"),
        }
    }
}

impl<T> From<T> for Memo<T> {
    /// A memo that is already computed.
    fn from(value: T) -> Self {
        Self {
            cell: OnceCell::with_value(value),
        }
    }
}
