//! Mapping of driver errors onto [`RepositoryError`]

use stampede_interfaces::RepositoryError;

/// Pool and transport failures are connection problems whatever the caller
/// was doing; everything else is attributed by `fallback`.
fn classify(error: sqlx::Error, fallback: impl FnOnce(String) -> RepositoryError) -> RepositoryError {
    match error {
        sqlx::Error::PoolClosed => RepositoryError::Closed,
        sqlx::Error::PoolTimedOut => {
            RepositoryError::connection("timed out waiting for a pooled connection")
        }
        sqlx::Error::Io(e) => RepositoryError::connection(e.to_string()),
        sqlx::Error::Configuration(e) => RepositoryError::connection(e.to_string()),
        other => fallback(other.to_string()),
    }
}

pub(crate) fn connection_error(error: sqlx::Error) -> RepositoryError {
    classify(error, RepositoryError::connection)
}

pub(crate) fn query_error(error: sqlx::Error) -> RepositoryError {
    classify(error, RepositoryError::query)
}

pub(crate) fn write_error(error: sqlx::Error) -> RepositoryError {
    classify(error, RepositoryError::write)
}
