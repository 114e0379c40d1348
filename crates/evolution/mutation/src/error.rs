/// Errors from catalogue construction.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("duplicate mutation id: {0}")]
    DuplicateId(String),
    #[error("preference for {cluster} references unknown mutation: {id}")]
    UnknownPreference { cluster: String, id: String },
    #[error("mutation {0} has no style variables")]
    EmptyPatch(String),
}
