use thiserror::Error;

/// Errors raised by the expression engine itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("Expression is too deep: depth {depth} exceeds limit {limit}.")]
    TooDeep { depth: usize, limit: usize },

    #[error("Cannot differentiate {0} with respect to {1}.")]
    NotDifferentiable(String, String),

    #[error("Unbound variable: [{0}]")]
    UnboundVariable(String),

    #[error("Unknown function: [{0}]")]
    UnknownFunction(String),
}
