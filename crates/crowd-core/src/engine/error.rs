use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "neighbor {index} has species {found} where {expected} was required; \
         the neighbor index is out of sync with the configuration"
    )]
    ConsistencyViolation {
        index: usize,
        expected: i32,
        found: i32,
    },

    #[error("cannot propose a move for an empty particle collection")]
    EmptyPopulation,
}
