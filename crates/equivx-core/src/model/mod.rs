pub mod path;
pub mod type_name;
pub mod value;

pub use path::{Path, PathPattern, PathSegment};
pub use type_name::TypeName;
pub use value::{ObjectRef, PayloadShape, Value};
