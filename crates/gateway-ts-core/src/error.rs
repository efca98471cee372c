use thiserror::Error;

/// Every failure is fatal for the run: protoc gets either a complete response
/// or exactly one of these.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("unknown type `{type_name}` referenced from {file}")]
    UnknownType { file: String, type_name: String },

    #[error("type `{type_name}` is declared in both {first_file} and {second_file}")]
    DuplicateType {
        type_name: String,
        first_file: String,
        second_file: String,
    },

    #[error("error generating ts file for {file}")]
    Render {
        file: String,
        #[source]
        source: RenderError,
    },

    #[error("error generating fetch module at {path}")]
    RenderFetchModule {
        path: String,
        #[source]
        source: RenderError,
    },

    #[error("failed to read existing fetch module at {path}")]
    HelperWriteProbe {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("file to generate {file} is not among the request's proto files")]
    MissingFileToGenerate { file: String },

    #[error("invalid http path template `{path}` on {method} in {file}: {reason}")]
    InvalidPathTemplate {
        file: String,
        method: String,
        path: String,
        reason: String,
    },
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

/// Lookup miss in the type registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type `{0}`")]
pub struct UnknownType(pub String);

/// Failure reported by a [`crate::generate::Renderer`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::fmt::Error> for RenderError {
    fn from(_: std::fmt::Error) -> Self {
        Self::new("formatter error while writing output")
    }
}
