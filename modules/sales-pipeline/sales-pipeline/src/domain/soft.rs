use super::error::DomainError;

/// Outcome of a list query that must not fail its caller.
///
/// A failed query is kept as `Degraded` so tests and callers can inspect it;
/// [`into_rows`](Self::into_rows) logs it and yields an empty list.
#[derive(Debug)]
#[must_use]
pub enum SoftList<T> {
    Loaded(Vec<T>),
    Degraded {
        entity: &'static str,
        error: DomainError,
    },
}

impl<T> SoftList<T> {
    pub fn from_result(entity: &'static str, result: Result<Vec<T>, DomainError>) -> Self {
        match result {
            Ok(rows) => Self::Loaded(rows),
            Err(error) => Self::Degraded { entity, error },
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Rows, or an empty list after logging the swallowed error.
    #[must_use]
    pub fn into_rows(self) -> Vec<T> {
        match self {
            Self::Loaded(rows) => rows,
            Self::Degraded { entity, error } => {
                tracing::warn!(entity, error = %error, "list query failed; returning no rows");
                Vec::new()
            }
        }
    }
}
