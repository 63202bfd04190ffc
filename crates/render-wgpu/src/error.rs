use std::path::PathBuf;

/// Errors from building render resources.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to read shader {}: {source}", path.display())]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader {} has no `{entry}` entry point", path.display())]
    MissingEntryPoint { path: PathBuf, entry: &'static str },
    #[error("shader `{label}` failed to compile: {message}")]
    ShaderCompile { label: String, message: String },
    #[error("shader `{label}` does not fit the cube pipeline: {message}")]
    Pipeline { label: String, message: String },
}
