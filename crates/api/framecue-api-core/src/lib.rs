//! framecue-api-core: values, property paths and write batches (engine-agnostic)

pub mod blend;
pub mod path;
pub mod value;
pub mod write_ops;

pub use blend::{lerp_f32, lerp_value, lerp_vec2, lerp_vec3, lerp_vec4};
pub use path::{PathError, PropPath};
pub use value::{Value, ValueKind};
pub use write_ops::{WriteBatch, WriteOp};
