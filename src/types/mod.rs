//! 运行时类型模型

pub mod constructor;
pub mod descriptor;
pub mod instance;

pub use constructor::{Args, BuildFn, Constructor, Param};
pub use descriptor::{Type, TypeBuilder, TypeDef, TypeKind};
pub use instance::Instance;
