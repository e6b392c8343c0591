use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::propagator::{MetadataError, MetadataPropagator};

/// Runs `exiftool -TagsFromFile <source> -all:all -overwrite_original <target>`.
#[derive(Debug, Clone)]
pub struct ExifToolPropagator {
    binary: PathBuf,
}

impl ExifToolPropagator {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, source: &Path, target: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("-TagsFromFile")
            .arg(source)
            .arg("-all:all")
            .arg("-overwrite_original")
            .arg(target)
            .stdin(Stdio::null());
        command
    }
}

impl Default for ExifToolPropagator {
    fn default() -> Self {
        Self::new("exiftool")
    }
}

impl MetadataPropagator for ExifToolPropagator {
    fn propagate(&self, source: &Path, target: &Path) -> Result<(), MetadataError> {
        debug!(
            source = %source.display(),
            target = %target.display(),
            "Copying metadata with {}",
            self.binary.display()
        );

        let output = self
            .command(source, target)
            .output()
            .map_err(|e| MetadataError::Unavailable {
                tool: self.binary.display().to_string(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(MetadataError::ToolFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!("{}", String::from_utf8_lossy(&output.stdout).trim());
        Ok(())
    }
}
