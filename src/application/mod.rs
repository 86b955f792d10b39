//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DevelopUseCase` - Compile and place the library inside the package
//! - `BuildUseCase` - Release compile, then wheel (and sdist) assembly
//! - `WatchUseCase` - Debounced rebuilds on file changes
//! - `CleanUseCase` - Remove build artifacts and installed dependencies
//!
//! ## Services
//!
//! - `BuildPipeline` - Discover, install dependencies, compile
//! - `SourceDiscovery` - Entry point and inclusion closure

pub mod build;
pub mod clean;
pub mod develop;
pub mod discovery;
pub mod pipeline;
pub mod watch;

pub use build::{BuildOptions, BuildOutcome, BuildUseCase};
pub use clean::{CleanOptions, CleanResult, CleanUseCase, SkipReason, SkippedFile};
pub use develop::{DevelopResult, DevelopUseCase};
pub use discovery::{discover, find_entry, SourceDiscovery};
pub use pipeline::{find_project_root, BuildPipeline, ConfigRequest, PreparedBuild};
pub use watch::{PipelineRunner, WatchEvent, WatchOptions, WatchUseCase};
