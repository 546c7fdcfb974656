mod account;
pub use account::{lookup_gid, lookup_uid};

mod ownership;
pub use ownership::chown_tree;
