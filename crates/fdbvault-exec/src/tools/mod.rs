//! Capability implementations backed by real commands and syscalls.
mod ps;
pub use ps::PsProcessLister;

mod chown;
pub use chown::ChownOwnershipFixer;

mod fdbbackup;
pub use fdbbackup::FdbBackupTool;

mod tar;
pub use tar::TarArchiver;

mod s3;
pub use s3::AwsS3Store;
