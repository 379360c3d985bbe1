//! Capability traits a value can declare instead of being probed at runtime.

use std::fmt;

use crate::error::BoxError;

use super::Value;

/// A value that can turn itself into a portable [`Value`] tree, which the
/// JSON driver then encodes recursively.
pub trait ToPortable: fmt::Debug + Send + Sync {
    fn to_portable(&self) -> Value;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A value that can serialize itself to wire bytes (e.g. a protobuf message).
pub trait WireSerializable: fmt::Debug + Send + Sync {
    fn to_wire_bytes(&self) -> Result<Vec<u8>, BoxError>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Adapter making any `prost` message wire-serializable.
#[derive(Debug, Clone, PartialEq)]
pub struct ProstMessage<M>(pub M);

impl<M: prost::Message> WireSerializable for ProstMessage<M> {
    fn to_wire_bytes(&self) -> Result<Vec<u8>, BoxError> {
        Ok(self.0.encode_to_vec())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<M>()
    }
}
