//! External process adapters: the Nim compiler and the supervisor that owns
//! whichever child is currently running

mod nim;
mod supervisor;

pub use nim::{staging_path, CompileRequest, CompilerInvoker};
pub use supervisor::{ProcessOutput, ProcessSupervisor};
