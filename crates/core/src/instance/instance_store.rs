//! File markers describing how far the instance has been provisioned.

use log::debug;
use semver::Version;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::instance_model::{
    setup_availability, update_availability, InstanceState, SetupAvailability,
};
use crate::utils::time_utils::now_naive_utc;
use crate::{Error, Result};

pub const SETUP_INSTANCE_MARKER: &str = "setup-instance";
pub const HOMEBOOK_INSTANCE_MARKER: &str = "homebook-instance";
pub const INSTANCE_VERSION_FILE: &str = "instance-version";

/// Persistent lifecycle markers of an instance.
pub trait InstanceStore: Send + Sync {
    fn has_setup_marker(&self) -> Result<bool>;
    fn write_setup_marker(&self) -> Result<()>;
    fn remove_setup_marker(&self) -> Result<()>;
    fn has_homebook_marker(&self) -> Result<bool>;
    fn write_homebook_marker(&self) -> Result<()>;
    /// `Ok(None)` when no version has been written yet; an unparsable file is
    /// an error.
    fn read_version(&self) -> Result<Option<Version>>;
    fn write_version(&self, version: &Version) -> Result<()>;
}

/// [`InstanceStore`] backed by plain files in the data directory.
pub struct FileInstanceStore {
    root: PathBuf,
}

impl FileInstanceStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            Error::Instance(format!(
                "Failed to create data directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn exists(&self, name: &str) -> Result<bool> {
        self.path(name)
            .try_exists()
            .map_err(|e| Error::Instance(format!("Failed to check {}: {}", name, e)))
    }

    /// Writes through a temporary file so readers never see partial content.
    fn write_atomic(&self, name: &str, contents: &str) -> Result<()> {
        let target = self.path(name);
        let tmp = self.path(&format!(".{name}.tmp"));
        fs::write(&tmp, contents)
            .and_then(|_| fs::rename(&tmp, &target))
            .map_err(|e| Error::Instance(format!("Failed to write {}: {}", name, e)))?;
        debug!("Wrote {}", target.display());
        Ok(())
    }

    fn write_marker(&self, name: &str) -> Result<()> {
        self.write_atomic(name, &format!("{}\n", now_naive_utc().and_utc().to_rfc3339()))
    }
}

impl InstanceStore for FileInstanceStore {
    fn has_setup_marker(&self) -> Result<bool> {
        self.exists(SETUP_INSTANCE_MARKER)
    }

    fn write_setup_marker(&self) -> Result<()> {
        self.write_marker(SETUP_INSTANCE_MARKER)
    }

    fn remove_setup_marker(&self) -> Result<()> {
        match fs::remove_file(self.path(SETUP_INSTANCE_MARKER)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Instance(format!(
                "Failed to remove {}: {}",
                SETUP_INSTANCE_MARKER, e
            ))),
        }
    }

    fn has_homebook_marker(&self) -> Result<bool> {
        self.exists(HOMEBOOK_INSTANCE_MARKER)
    }

    fn write_homebook_marker(&self) -> Result<()> {
        self.write_marker(HOMEBOOK_INSTANCE_MARKER)
    }

    fn read_version(&self) -> Result<Option<Version>> {
        let contents = match fs::read_to_string(self.path(INSTANCE_VERSION_FILE)) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Instance(format!(
                    "Failed to read {}: {}",
                    INSTANCE_VERSION_FILE, e
                )))
            }
        };
        Version::parse(contents.trim()).map(Some).map_err(|e| {
            Error::Instance(format!(
                "Invalid version '{}' in {}: {}",
                contents.trim(),
                INSTANCE_VERSION_FILE,
                e
            ))
        })
    }

    fn write_version(&self, version: &Version) -> Result<()> {
        self.write_atomic(INSTANCE_VERSION_FILE, &format!("{version}\n"))
    }
}

/// Reads the lifecycle snapshot of the instance.
pub fn read_instance_state(
    store: &dyn InstanceStore,
    app_version: &Version,
) -> Result<InstanceState> {
    let homebook_marker = store.has_homebook_marker()?;
    let setup_marker = store.has_setup_marker()?;
    let instance_version = store.read_version()?;
    let setup = setup_availability(
        homebook_marker,
        setup_marker,
        instance_version.as_ref(),
        app_version,
    );
    Ok(InstanceState {
        setup_availability: setup,
        update_availability: update_availability(
            homebook_marker,
            instance_version.as_ref(),
            app_version,
        ),
        app_version: app_version.to_string(),
        instance_version: instance_version.map(|v| v.to_string()),
        ready: setup == SetupAvailability::AlreadyConfigured,
    })
}
