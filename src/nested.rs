//! Nested map access.
//!
//! A nested map is a JSON object whose values may themselves be objects. A
//! [`KeyPath`] describes a walk down that tree, one key per level.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::error::{AccessError, AccessResult};

/// A JSON object whose values may be further objects.
pub type NestedMap = Map<String, Value>;

/// An ordered sequence of keys, applied left to right.
///
/// The dotted form (`Display` and `FromStr`) is for display and simple input
/// only. It cannot express a key that contains `.` or an empty key, so such
/// paths do not survive `to_string().parse()`. [`KeyPath::keys`] and the serde
/// form (a list of strings) are exact.
///
/// # Examples
///
/// ```
/// use gatherx::KeyPath;
///
/// let path: KeyPath = "a.b.c".parse().unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "a.b.c");
/// assert_eq!(path, KeyPath::from(["a", "b", "c"]));
///
/// // "a.b" is one key, but its dotted form reads back as two
/// let dotted = KeyPath::from(["a.b"]);
/// assert_eq!(dotted.to_string().parse::<KeyPath>().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a key to the end of the path.
    pub fn push(&mut self, key: impl Into<String>) {
        self.0.push(key.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for KeyPath {
    type Err = std::convert::Infallible;

    /// Split on `.`; the empty string is the empty path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::new());
        }
        Ok(s.split('.').collect())
    }
}

impl AsRef<[String]> for KeyPath {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for KeyPath {
    fn from(keys: [S; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<S: Into<String> + Clone> From<&[S]> for KeyPath {
    fn from(keys: &[S]) -> Self {
        keys.iter().cloned().collect()
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

/// Walk `path` through `map`, returning the value it leads to.
///
/// `path` is anything that views as a slice of keys: an array of `&str`, a
/// `Vec<String>` or a [`KeyPath`]. An empty path returns `map` itself.
///
/// # Errors
///
/// Returns [`AccessError::MissingKey`] when a mapping along the way has no entry
/// for the next key, and [`AccessError::NotAMapping`] when the walk reaches a
/// terminal value before the path is exhausted. Either way the error names the
/// first key that could not be resolved.
///
/// # Examples
///
/// ```
/// use gatherx::access;
/// use serde_json::json;
///
/// let map = json!({"a": {"b": 2}});
/// assert_eq!(access(&map, &["a", "b"]).unwrap(), &json!(2));
/// assert_eq!(access(&map, &["a"]).unwrap(), &json!({"b": 2}));
///
/// let path: gatherx::KeyPath = "a.b".parse().unwrap();
/// assert_eq!(access(&map, &path).unwrap(), &json!(2));
///
/// let err = access(&json!({"a": 1}), &["a", "b"]).unwrap_err();
/// assert_eq!(err.key(), Some("b"));
/// ```
pub fn access<'a, P, K>(map: &'a Value, path: &P) -> AccessResult<&'a Value>
where
    P: AsRef<[K]> + ?Sized,
    K: AsRef<str>,
{
    let mut current = map;

    for (depth, key) in path.as_ref().iter().enumerate() {
        let key = key.as_ref();

        #[cfg(feature = "tracing")]
        trace!(depth, key, "resolving key");

        current = match current {
            Value::Object(entries) => entries.get(key).ok_or_else(|| AccessError::MissingKey {
                key: key.to_string(),
                depth,
            })?,
            other => {
                return Err(AccessError::NotAMapping {
                    key: key.to_string(),
                    depth,
                    found: kind_of(other),
                })
            }
        };
    }

    Ok(current)
}

/// Same walk as [`access`], yielding a mutable reference to the terminal value.
pub fn access_mut<'a, P, K>(map: &'a mut Value, path: &P) -> AccessResult<&'a mut Value>
where
    P: AsRef<[K]> + ?Sized,
    K: AsRef<str>,
{
    let mut current = map;

    for (depth, key) in path.as_ref().iter().enumerate() {
        let key = key.as_ref();

        #[cfg(feature = "tracing")]
        trace!(depth, key, "resolving key (mutable)");

        current = match current {
            Value::Object(entries) => {
                entries
                    .get_mut(key)
                    .ok_or_else(|| AccessError::MissingKey {
                        key: key.to_string(),
                        depth,
                    })?
            }
            other => {
                return Err(AccessError::NotAMapping {
                    key: key.to_string(),
                    depth,
                    found: kind_of(other),
                })
            }
        };
    }

    Ok(current)
}

/// Walk `path` through `map` and deserialize the terminal value into `T`.
///
/// ```
/// use gatherx::access_as;
/// use serde_json::json;
///
/// let map = json!({"repos": {"count": 3}});
/// let count: u32 = access_as(&map, &["repos", "count"]).unwrap();
/// assert_eq!(count, 3);
/// ```
pub fn access_as<T, P, K>(map: &Value, path: &P) -> AccessResult<T>
where
    T: DeserializeOwned,
    P: AsRef<[K]> + ?Sized,
    K: AsRef<str>,
{
    let keys = path.as_ref();
    let value = access(map, keys)?;
    T::deserialize(value).map_err(|err| AccessError::Decode {
        path: keys
            .iter()
            .map(|key| key.as_ref())
            .collect::<Vec<_>>()
            .join("."),
        message: err.to_string(),
    })
}
