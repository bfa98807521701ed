use rust_decimal::Decimal;
use thiserror::Error;

pub type PhResult<T> = Result<T, PhError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhError {
    #[error("Non-positive value for {what}: {value}")]
    NonPositive { what: &'static str, value: Decimal },

    #[error("Negative value for {what}: {value}")]
    Negative { what: &'static str, value: Decimal },

    #[error("Decimal arithmetic out of range in {what}")]
    OutOfRange { what: &'static str },
}
