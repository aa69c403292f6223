use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Row version used for optimistic concurrency. Starts at 0 on creation and
/// grows by one on every accepted transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version<T>(i64, #[serde(skip)] PhantomData<T>);

impl<T> Version<T> {
    pub fn new(version: impl Into<i64>) -> Self {
        Self(version.into(), PhantomData)
    }

    pub fn initial() -> Self {
        Self::new(0)
    }

    pub fn next(&self) -> Self {
        Self::new(self.0 + 1)
    }
}

impl<T> From<Version<T>> for i64 {
    fn from(version: Version<T>) -> Self {
        version.0
    }
}

impl<T> AsRef<i64> for Version<T> {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}
