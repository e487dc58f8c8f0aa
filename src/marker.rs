use crate::error::{HiddenError, Result};
use crate::utils::file::{contains_entry, entry_line, is_hidden_name, needs_separator, remove_entry};
use log::{debug, info, warn};
use std::fs::{self, OpenOptions, Permissions};
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name written to the control file when no other entry is configured
pub const DEFAULT_ENTRY: &str = "Encrypted";

/// Control file honoured by GNOME Files, Nemo, Caja and friends
pub const CONTROL_FILE_NAME: &str = ".hidden";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideOutcome {
    Appended,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnhideOutcome {
    Removed,
    NotPresent,
}

/// Keeps one folder listed in `<home>/.hidden`.
///
/// The entry name is the only source for both the derived target path and
/// the line written to the control file. The base directory only affects
/// `target_dir`; the control file always lives in the home directory.
#[derive(Debug, Clone)]
pub struct HiddenMarker {
    base_dir: PathBuf,
    target_dir: PathBuf,
    control_file: PathBuf,
    entry: String,
}

impl HiddenMarker {
    pub fn new(base_dir: impl Into<PathBuf>, home_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.into();
        Self {
            target_dir: base_dir.join(DEFAULT_ENTRY),
            base_dir,
            control_file: home_dir.as_ref().join(CONTROL_FILE_NAME),
            entry: DEFAULT_ENTRY.to_string(),
        }
    }

    /// Resolves the home directory once, here, rather than on every operation.
    pub fn for_current_user(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or(HiddenError::NoHomeDir)?;
        Ok(Self::new(base_dir, home_dir))
    }

    pub fn with_entry(mut self, entry: &str) -> Result<Self> {
        if entry.is_empty()
            || entry.contains('/')
            || entry.contains('\n')
            || is_hidden_name(entry)
        {
            return Err(HiddenError::InvalidEntry(entry.to_string()));
        }

        self.entry = entry.to_string();
        self.target_dir = self.base_dir.join(entry);
        Ok(self)
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Folder the entry refers to. Never created or checked here.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn control_file(&self) -> &Path {
        &self.control_file
    }

    /// Makes sure the control file lists the entry, appending it if absent.
    ///
    /// Existing content is never truncated or rewritten. If the last line has
    /// no terminator, a `\n` is written ahead of the entry line so the two
    /// names stay apart. The read and the append are not locked, so only one
    /// caller may run this at a time per control file; two overlapping calls
    /// can both append the entry.
    pub fn ensure_hidden(&self) -> Result<HideOutcome> {
        self.create_if_missing()?;

        let content = self.read_control_file()?;
        if contains_entry(&content, &self.entry) {
            debug!(
                "{:?} already listed in {:?}",
                self.entry, self.control_file
            );
            return Ok(HideOutcome::AlreadyPresent);
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.control_file)
            .map_err(|source| HiddenError::Open {
                path: self.control_file.clone(),
                source,
            })?;

        let mut line = Vec::new();
        if needs_separator(&content) {
            line.push(b'\n');
        }
        line.extend_from_slice(&entry_line(&self.entry));
        self.write_to(&mut file, &line)?;

        info!("Added {:?} to {:?}", self.entry, self.control_file);
        Ok(HideOutcome::Appended)
    }

    /// Removes every line exactly matching the entry. A missing control file
    /// is left missing.
    ///
    /// The new content goes to a temporary file next to the control file,
    /// which then replaces it, so a failed write leaves the old file intact.
    pub fn remove_hidden(&self) -> Result<UnhideOutcome> {
        let metadata = match self.control_file_metadata()? {
            Some(metadata) => metadata,
            None => return Ok(UnhideOutcome::NotPresent),
        };

        let content = self.read_control_file()?;
        let remaining = match remove_entry(&content, &self.entry) {
            Some(remaining) => remaining,
            None => {
                if contains_entry(&content, &self.entry) {
                    warn!(
                        "{:?} only appears as part of a longer line in {:?}; left as is",
                        self.entry, self.control_file
                    );
                } else {
                    debug!("{:?} not listed in {:?}", self.entry, self.control_file);
                }
                return Ok(UnhideOutcome::NotPresent);
            }
        };

        self.replace_control_file(&remaining, metadata.permissions())?;

        info!("Removed {:?} from {:?}", self.entry, self.control_file);
        Ok(UnhideOutcome::Removed)
    }

    pub fn is_hidden(&self) -> Result<bool> {
        if self.control_file_metadata()?.is_none() {
            return Ok(false);
        }

        let content = self.read_control_file()?;
        Ok(contains_entry(&content, &self.entry))
    }

    fn control_file_metadata(&self) -> Result<Option<fs::Metadata>> {
        match fs::metadata(&self.control_file) {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(HiddenError::Stat {
                path: self.control_file.clone(),
                source,
            }),
        }
    }

    fn create_if_missing(&self) -> Result<()> {
        if self.control_file_metadata()?.is_some() {
            return Ok(());
        }

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        match options.open(&self.control_file) {
            Ok(_) => {
                info!("Created {:?}", self.control_file);
                Ok(())
            }
            // Someone else created it between the stat and the open
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(source) => Err(HiddenError::Create {
                path: self.control_file.clone(),
                source,
            }),
        }
    }

    fn read_control_file(&self) -> Result<Vec<u8>> {
        fs::read(&self.control_file).map_err(|source| HiddenError::Read {
            path: self.control_file.clone(),
            source,
        })
    }

    fn write_to(&self, writer: &mut impl Write, bytes: &[u8]) -> Result<()> {
        writer
            .write_all(bytes)
            .and_then(|_| writer.flush())
            .map_err(|source| HiddenError::Write {
                path: self.control_file.clone(),
                source,
            })
    }

    // A symlinked control file is replaced by a regular file here.
    fn replace_control_file(&self, content: &[u8], permissions: Permissions) -> Result<()> {
        let dir = self
            .control_file
            .parent()
            .unwrap_or_else(|| Path::new("."));

        let mut temp = NamedTempFile::new_in(dir).map_err(|source| HiddenError::Create {
            path: dir.to_path_buf(),
            source,
        })?;

        self.write_to(&mut temp, content)?;

        let write_error = |source: std::io::Error| HiddenError::Write {
            path: self.control_file.clone(),
            source,
        };
        temp.as_file().sync_all().map_err(write_error)?;
        fs::set_permissions(temp.path(), permissions).map_err(write_error)?;
        temp.persist(&self.control_file)
            .map_err(|e| write_error(e.error))?;

        Ok(())
    }
}
