/// Errors from the graph store / builder.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("self-loop rejected for node {id}")]
    SelfLoop { id: String },

    #[error("edge not found: {source} -> {target} ({relation})")]
    EdgeNotFound {
        source: String,
        target: String,
        relation: String,
    },

    #[error("unknown relation type: {relation}")]
    UnknownRelation { relation: String },
}
