//! Debug artifacts for sources that defeat every extraction strategy
//!
//! The artifact is a plain-text dump of the raw source, written next to it,
//! so the file can be diagnosed offline while the run moves on. Nothing in
//! the pipeline ever reads one back; the prefix only serves to keep
//! artifacts out of later directory scans.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Prefix of debug artifact file names
pub const ARTIFACT_PREFIX: &str = "failed-";

/// Dump the raw text of an unparsable source next to the source file
///
/// Never raises: any problem writing the artifact is logged and swallowed
/// so the run can continue.
pub fn dump_unparsed(source: &Path, text: &str) -> Option<PathBuf> {
    let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
        error!("Cannot derive an artifact name from {}", source.display());
        return None;
    };

    let artifact = source.with_file_name(format!("{}{}", ARTIFACT_PREFIX, name));
    match fs::write(&artifact, text) {
        Ok(()) => {
            warn!("Dumped unparsed source to {}", artifact.display());
            Some(artifact)
        }
        Err(e) => {
            error!("Could not write debug artifact {}: {}", artifact.display(), e);
            None
        }
    }
}
