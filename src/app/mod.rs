pub mod config;

use actix_web::error::BlockingError;
use async_graphql::ErrorExtensions;
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

use crate::{
    database::store::Store,
    graphql::{build_schema, AppSchema},
};

/** Used for sharing the store handle and the compiled schema between requests */
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub schema: AppSchema,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        let schema = build_schema(store.clone());

        Self { store, schema }
    }
}

/** Holds the errors an operation can fail with */
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("User already exists")]
    AlreadyExists,
    #[error("Incorrect password")]
    InvalidCredentials,
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),
}

impl AppError {
    /// Machine readable code placed in the `extensions` of a GraphQL error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists => "ALREADY_EXISTS",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::TransactionFailure(_) => "TRANSACTION_FAILURE",
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::AlreadyExists
            }
            _ => AppError::TransactionFailure(err.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AppError::TransactionFailure(err.to_string())
    }
}

impl From<BlockingError> for AppError {
    fn from(_: BlockingError) -> Self {
        AppError::TransactionFailure(String::from("store call was cancelled"))
    }
}
