use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrioError {
    /// Malformed genotype, interval or numeric field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Distance search over an empty parental allele list
    #[error("No parental alleles to compare against")]
    MissingCandidates,

    /// A consistent trio reported a non-zero distance
    #[error("Inconsistent classification: {0}")]
    ConsistencyViolation(String),
}

impl TrioError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<TrioError> for String {
    fn from(err: TrioError) -> Self {
        err.to_string()
    }
}
