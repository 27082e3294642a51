use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Invalid {what}: expected object")]
    NotAnObject { what: &'static str },

    #[error("Invalid pack data: expected an array or an object with a `{key}` array")]
    UnexpectedListShape { key: &'static str },

    #[error("Invalid pack definition: {0}")]
    InvalidDefinition(#[source] serde_json::Error),
}
