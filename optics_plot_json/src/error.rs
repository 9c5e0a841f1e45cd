use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown boundary type `{0}`")]
    UnknownBoundaryType(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error(
        r#"unrecognized config layout, expected {{"ray": {{"boundaries": [...]}}}} or a map of {{"type": ...}} objects"#
    )]
    UnrecognizedSchema,

    #[error("boundary `{at}`: {source}")]
    Boundary {
        at: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub(crate) fn at(self, at: impl ToString) -> Self {
        Self::Boundary {
            at: at.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through boundary context.
    pub fn root(&self) -> &Self {
        match self {
            Self::Boundary { source, .. } => source.root(),
            other => other,
        }
    }
}
