use std::{
    io,
    os::unix::fs::{chown, lchown},
    path::Path,
};

use walkdir::WalkDir;

use crate::ExecError;

/// Re-own `root` to `uid:gid`, and everything below it when `recursive`.
///
/// `root` itself is resolved through symlinks; entries below it are re-owned with `lchown` and
/// symlinked directories are not descended into. Returns the number of paths changed.
pub fn chown_tree(root: &Path, uid: u32, gid: u32, recursive: bool) -> Result<usize, ExecError> {
    let mut walk = WalkDir::new(root).follow_links(false);
    if !recursive {
        walk = walk.max_depth(0);
    }
    let mut changed = 0;
    for entry in walk {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        let path = entry.path();
        let res = if entry.depth() == 0 {
            chown(path, Some(uid), Some(gid))
        } else {
            lchown(path, Some(uid), Some(gid))
        };
        res.map_err(|source| ExecError::Chown {
            path: path.to_path_buf(),
            source,
        })?;
        changed += 1;
    }
    Ok(changed)
}

fn walk_error(root: &Path, err: walkdir::Error) -> ExecError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop"));
    ExecError::Chown { path, source }
}
