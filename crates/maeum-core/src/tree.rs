//! Where ARCH_SNAPSHOT gets the project tree when the turn carries none.

use maeum_types::Result;

use crate::graph::FileEntry;

/// Supplies the current project's file listing.
///
/// The binary scans the working directory; tests use [`StaticTree`].
pub trait TreeSource: Send + Sync {
    /// The source files of the current tree, in a stable order.
    fn files(&self) -> Result<Vec<FileEntry>>;
}

/// A fixed listing.
#[derive(Debug, Clone, Default)]
pub struct StaticTree {
    files: Vec<FileEntry>,
}

impl StaticTree {
    pub fn new(files: Vec<FileEntry>) -> Self {
        Self { files }
    }
}

impl TreeSource for StaticTree {
    fn files(&self) -> Result<Vec<FileEntry>> {
        Ok(self.files.clone())
    }
}
