use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constants::default_extensions;
use crate::types::Extension;

/// Recursive, extension-filtered file discovery.
///
/// Produces a lazy, finite sequence of candidate input files. Calling
/// [`Discovery::files`] again restarts the walk from scratch. Yield order
/// follows the underlying directory walk and is not guaranteed to be sorted;
/// callers must not depend on it for correctness.
#[derive(Clone, Debug)]
pub struct Discovery {
    extensions: Vec<Extension>,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl Discovery {
    /// Create a discovery accepting the given extensions (case-insensitive,
    /// each including the leading dot).
    pub fn new(extensions: Vec<Extension>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    /// Whether a path's name carries one of the accepted extensions.
    pub fn matches(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_lowercase(),
            None => return false,
        };
        self.extensions.iter().any(|ext| name.ends_with(ext))
    }

    /// Lazily yield every matching file under `root`.
    ///
    /// A root that is itself a matching file yields exactly that file. A
    /// root with zero matches yields nothing; deciding whether empty input
    /// is fatal is left to the caller.
    pub fn files(&self, root: &Path) -> impl Iterator<Item = PathBuf> + '_ {
        let single = if root.is_file() {
            if self.matches(root) {
                Some(root.to_path_buf())
            } else {
                None
            }
        } else {
            None
        };
        let walk_root = if root.is_file() { None } else { Some(root) };

        single.into_iter().chain(
            walk_root
                .map(WalkDir::new)
                .into_iter()
                .flat_map(|walker| walker.into_iter())
                .filter_map(std::result::Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.path().to_path_buf())
                .filter(move |path| self.matches(path)),
        )
    }
}
