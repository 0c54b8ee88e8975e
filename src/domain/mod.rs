pub mod device;
pub mod feed;
pub mod opportunity;
pub mod platform_module;

pub use device::*;
pub use feed::*;
pub use opportunity::*;
pub use platform_module::*;
