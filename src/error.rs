use thiserror::Error;

/// Build-time failures. Runtime mapping failures are not errors: writes that
/// fail to map are dropped and reads fall back to the outer default.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DialogError {
    #[error("`{type_name}` has no usable constructor for owner `{owner}`")]
    MissingConstructor {
        type_name: &'static str,
        owner: &'static str,
    },
    #[error("option `{key}`: mapper `{mapper}` maps `{expected}` but the member is `{found}`")]
    MapperTypeMismatch {
        key: String,
        mapper: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("option `{key}`: editor `{generator}` edits `{expected}` but the value is `{found}`")]
    GeneratorTypeMismatch {
        key: String,
        generator: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("action `{key}` takes {arity} argument(s); actions must take none")]
    ActionArguments { key: String, arity: usize },
    #[error("option `{key}` is secret but `{type_name}` has no editor that can be masked")]
    SecretWithoutEditor { key: String, type_name: String },
    #[error("type `{type_name}` nests deeper than {limit} levels")]
    DescriptorDepthExceeded { type_name: String, limit: usize },
    #[error("state is already bound to dialog #{dialog}")]
    AlreadyBound { dialog: u64 },
    #[error("entry `{entry}` left the surface at depth {found}, expected {expected}")]
    SurfaceDepthMismatch {
        entry: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T, E = DialogError> = std::result::Result<T, E>;
