//! Artifact packaging: in-place copies, wheels and source archives

mod inplace;
pub mod metadata;
mod mingw;
mod sdist;
mod wheel;

pub use inplace::install_inplace;
pub use mingw::{MingwRuntime, MINGW_RUNTIME_DLLS};
pub use sdist::SdistBuilder;
pub use wheel::WheelBuilder;
