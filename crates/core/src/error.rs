use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    #[error("policy name must not be empty")]
    InvalidQuery,
}
