//! Location of the engine's runtime data files.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Layouts searched for the data directory, relative to the working directory or the executable.
const DATA_DIR_CANDIDATES: [&str; 2] = ["astral_engine/data", "data"];

/// Cached path to the directory containing the engine's runtime data files.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Construct a data path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Resolve the most likely location of the runtime data directory.
fn detect_data_root() -> PathBuf {
    let mut bases = vec![PathBuf::new()];
    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        bases.push(dir.to_path_buf());
        if let Some(parent) = dir.parent() {
            bases.push(parent.to_path_buf());
        }
    }
    first_existing(&bases).unwrap_or_else(|| PathBuf::from(DATA_DIR_CANDIDATES[0]))
}

/// First candidate data directory that exists under any of `bases`.
fn first_existing(bases: &[PathBuf]) -> Option<PathBuf> {
    bases
        .iter()
        .flat_map(|base| DATA_DIR_CANDIDATES.iter().map(move |c| base.join(c)))
        .find(|candidate| candidate.is_dir())
}
