use thiserror::Error;

/// Errors surfaced by poster stores.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("unable to reach MongoDB at {uri}: {source}")]
    Connection {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("a poster with id '{0}' already exists")]
    DuplicateKey(String),

    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),
}

/// MongoDB server code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Returns true when the driver error is a duplicate `_id` write failure.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::BulkWrite(failure) => failure
            .write_errors
            .as_ref()
            .map(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY_CODE))
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_message_names_the_id() {
        let err = DbError::DuplicateKey("tt0111161".to_string());
        assert_eq!(
            err.to_string(),
            "a poster with id 'tt0111161' already exists"
        );
    }
}
