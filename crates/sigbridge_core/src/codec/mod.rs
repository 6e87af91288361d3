mod bus;
mod error;
mod forward;
mod infer;
mod options;
mod registry;
mod resource;
mod reverse;
mod scalar;
mod signature;

/// Bus-side value tree.
pub use bus::BusValue;
/// Error and result aliases.
pub use error::{CodecError, ErrorKind, Result};
/// Bus to resource translation entry points.
pub use forward::{message_to_object, set_resource_property, to_resource_value};
/// Signature inference from resource values and variant arrays.
pub use infer::{infer_signature, infer_variant_array_signature, resource_kind};
/// Translation limits and 64-bit integer handling.
pub use options::{IntegerBounds, MAX_SAFE_INTEGER, MIN_SAFE_INTEGER, TranslateOptions};
/// Named struct and dictionary definitions.
pub use registry::{DictField, DictShape, NamedShape, StructField, StructShape, TypeRegistry};
/// Resource-side property bag model.
pub use resource::{ArrayData, MAX_ARRAY_DIMENSIONS, Object, Property, ResourceArray, ResourceKind, ResourceValue};
/// Resource to bus translation entry points.
pub use reverse::{object_to_message, to_bus_value};
/// Scalar text helpers shared by both directions.
pub use scalar::{is_valid_object_path, parse_scalar, property_name};
/// Signature grammar and parser.
pub use signature::{MAX_ARRAY_DEPTH, MAX_SIGNATURE_LEN, MAX_STRUCT_DEPTH, Signature, TypeToken, count_complete_types, parse_complete_type};
