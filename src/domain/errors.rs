//! 领域错误

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Order id must not be empty")]
    EmptyOrderId,
    #[error("Unsupported sender type: {0}")]
    UnsupportedSender(String),
    #[error("Order repository has been released")]
    RepositoryReleased,
}
