//! RuntimeProbe port - asks the target interpreter what it is

use crate::domain::value_objects::RuntimeInfo;
use crate::error::NuwaResult;

pub trait RuntimeProbe {
    /// Fails with an environment error when the interpreter cannot be run
    fn probe(&self) -> NuwaResult<RuntimeInfo>;
}

/// Fixed answer, for tests and cross-tagging
#[derive(Debug, Clone)]
pub struct StaticProbe(pub RuntimeInfo);

impl RuntimeProbe for StaticProbe {
    fn probe(&self) -> NuwaResult<RuntimeInfo> {
        Ok(self.0.clone())
    }
}
