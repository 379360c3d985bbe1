//! Error types for saving and capture contexts.

use std::io;

use thiserror::Error;

/// Boxed error returned by value-provided serializers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single save call.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Destination name has no extension to pick a format from.
    #[error("no extension in destination: {destination}")]
    MissingExtension { destination: String },

    /// Extension is not registered. Lists every (token, driver) pair.
    #[error("unknown extension '{extension}', supports {}", format_supported(.supported))]
    UnsupportedFormat {
        extension: String,
        supported: Vec<(String, String)>,
    },

    /// A registry key that no destination name could ever produce.
    #[error("invalid extension token '{token}'")]
    InvalidToken { token: String },

    /// A driver received a value it structurally cannot handle.
    #[error("{driver} driver expects {expected}, got {found}")]
    UnsupportedValueType {
        driver: &'static str,
        expected: &'static str,
        found: String,
    },

    /// The JSON driver found a value none of its converters recognize.
    #[error("cannot encode value of type {type_name} as JSON")]
    Encode { type_name: String },

    /// Value given to the message driver has no wire serialization.
    #[error("value of type {type_name} cannot be serialized to wire bytes")]
    NotWireSerializable { type_name: String },

    /// Value-provided wire serializer failed.
    #[error("wire serialization of {type_name} failed: {source}")]
    Wire {
        type_name: String,
        #[source]
        source: BoxError,
    },

    /// The image codec has no encoder for this extension.
    #[error("no image encoder for extension '{extension}'")]
    UnsupportedCodec { extension: String },

    /// Opening the sink for a location failed.
    #[error("failed to open {location}")]
    Open {
        location: String,
        #[source]
        source: io::Error,
    },

    /// Location uses a scheme the sink opener cannot write to.
    #[error("unsupported location: {location}")]
    UnsupportedLocation { location: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("npy: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),

    #[error("npz: {0}")]
    Npz(#[from] ndarray_npy::WriteNpzError),

    #[error("image: {0}")]
    Image(#[from] image::ImageError),
}

fn format_supported(supported: &[(String, String)]) -> String {
    let pairs: Vec<String> = supported
        .iter()
        .map(|(token, driver)| format!("('{}', '{}')", token, driver))
        .collect();
    format!("[{}]", pairs.join(", "))
}

/// Misuse of capture contexts. Always a programming error in the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// A context exited while a context entered after it was still active.
    #[error("capture context {expected} exited while context {found} is still active")]
    NestingViolation { expected: u64, found: u64 },

    /// The context's frame is no longer on the stack.
    #[error("capture context {id} is not on the capture stack")]
    NotActive { id: u64 },
}
