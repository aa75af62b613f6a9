use crate::error::{IfwatchError, Result};
use crate::platform::PromiscControl;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Facility id of the general interface statistics monitor.
pub const IFACE_STATS_FACILITY: &str = "iface-stats";

/// Cross-process coordination through files in a runtime state directory:
/// a per-facility marker (single instance of each monitor kind), a shared
/// count of running instances, and a snapshot of pre-existing promiscuous
/// flags owned collectively by the whole instance group.
pub struct FacilityCoordinator {
    state_dir: PathBuf,
}

impl FacilityCoordinator {
    pub fn new(state_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&state_dir)?;
        Ok(Self { state_dir })
    }

    /// Default state directory: the OS runtime dir when available,
    /// otherwise the system temp dir.
    pub fn default_state_dir() -> PathBuf {
        dirs::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("ifwatch")
    }

    fn marker_path(&self, facility_id: &str) -> PathBuf {
        self.state_dir.join(format!("{facility_id}.id"))
    }

    fn count_path(&self) -> PathBuf {
        self.state_dir.join("instances")
    }

    fn snapshot_path(&self) -> PathBuf {
        self.state_dir.join("promisc.snapshot")
    }

    /// Marks this facility active, or fails when another process already
    /// holds the marker. The exclusive create is atomic; nothing else is
    /// mutated on failure.
    pub fn acquire(&self, facility_id: &str) -> Result<()> {
        let path = self.marker_path(facility_id);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(mut marker) => {
                let _ = writeln!(marker, "{}", std::process::id());
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(IfwatchError::FacilityActive(facility_id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Removes the marker. Called on every shutdown path, errors included,
    /// so a missing marker is not an error here.
    pub fn release(&self, facility_id: &str) {
        let _ = fs::remove_file(self.marker_path(facility_id));
    }

    /// Count of running instances of the tool across all facility kinds.
    pub fn instance_count(&self) -> i64 {
        fs::read_to_string(self.count_path())
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Read-modify-write of the shared instance counter; returns the new
    /// count. The window between read and write is the documented
    /// limitation of file-backed coordination under concurrent startup.
    pub fn adjust_instance_count(&self, delta: i64) -> Result<i64> {
        let count = (self.instance_count() + delta).max(0);
        fs::write(self.count_path(), format!("{count}\n"))?;
        Ok(count)
    }

    /// When no other instance is running, snapshots every listed
    /// interface's promiscuous flag and forces promiscuous mode on.
    /// Returns whether this process did the enabling.
    pub fn enable_promiscuous_if_first(
        &self,
        names: &[String],
        ctl: &mut dyn PromiscControl,
    ) -> Result<bool> {
        if self.instance_count() != 0 {
            return Ok(false);
        }

        let mut snapshot = String::new();
        for name in names {
            let was_on = ctl.get(name)?;
            snapshot.push_str(&format!("{name} {}\n", u8::from(was_on)));
        }
        fs::write(self.snapshot_path(), snapshot)?;

        for name in names {
            ctl.set(name, true)?;
        }

        Ok(true)
    }

    /// When this is the last remaining instance, restores the snapshotted
    /// flags (turning promiscuous mode back off where it was off) and
    /// discards the snapshot. Returns whether the restore ran.
    pub fn disable_promiscuous_if_last(&self, ctl: &mut dyn PromiscControl) -> Result<bool> {
        if self.instance_count() != 1 {
            return Ok(false);
        }

        let path = self.snapshot_path();
        if !Path::new(&path).exists() {
            return Ok(false);
        }

        let snapshot = fs::read_to_string(&path)?;
        for line in snapshot.lines() {
            let Some((name, flag)) = line.rsplit_once(' ') else {
                continue;
            };
            let was_on = flag.trim() == "1";
            ctl.set(name, was_on)?;
        }

        let _ = fs::remove_file(path);
        Ok(true)
    }
}
