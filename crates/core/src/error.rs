/// Errors raised while turning parameters into SQL fragments.
///
/// These are always detected before any statement reaches the database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryBuilderError {
    #[error("Nothing to update: the update parameter has no present fields")]
    NothingToUpdate,

    #[error("Unknown sort column: {0}")]
    UnknownSortColumn(String),

    #[error("Condition `{sql}` has {placeholders} placeholder(s) but {args} argument(s)")]
    PlaceholderMismatch {
        sql: String,
        placeholders: usize,
        args: usize,
    },

    #[error("Condition fragment is empty")]
    EmptyCondition,
}
