//! Production implementations of the backup pipeline's external tools.
//!
//! Everything here shells out (`ps`, `fdbbackup`, `tar`, `aws`) or talks to the OS directly
//! (`getpwnam_r`, `lchown`). The pipeline only sees the traits from `fdbvault_core::ports`.
mod error;
pub use error::ExecError;

mod utils;
pub use utils::{chown_tree, lookup_gid, lookup_uid};

pub mod subprocess;
pub use subprocess::{Captured, ChainedStream, CommandSpec, LogConfig, run_captured};

mod tools;
pub use tools::{AwsS3Store, ChownOwnershipFixer, FdbBackupTool, PsProcessLister, TarArchiver};
