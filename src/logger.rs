use crate::cli::RateUnit;
use crate::error::{IfwatchError, Result};
use crate::registry::InterfaceEntry;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;

/// Log file used when `--log` is given without an explicit path.
pub const DEFAULT_LOG_NAME: &str = "ifwatch_iface_stats.log";

/// Periodic counter-snapshot writer with externally requested rotation.
///
/// Rotation closes and reopens the same path; a log shipper is expected
/// to have moved the old file aside first. The reopen happens only from
/// the capture loop, never between the lines of a snapshot.
#[derive(Debug)]
pub struct SnapshotLogger {
    file: File,
    path: String,
}

impl SnapshotLogger {
    pub fn open(path: &str) -> Result<Self> {
        let file = Self::open_file(path)?;
        Ok(Self {
            file,
            path: path.to_string(),
        })
    }

    fn open_file(path: &str) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| IfwatchError::LogOpen {
                path: path.to_string(),
                source,
            })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// One timestamped line, flushed immediately.
    pub fn write_line(&mut self, message: &str) -> Result<()> {
        let now = Local::now();
        writeln!(
            self.file,
            "{} {} {}",
            now.format("%Y-%m-%d"),
            now.format("%H:%M:%S"),
            message
        )?;
        self.file.flush()?;
        Ok(())
    }

    /// Dumps every interface's counters plus the elapsed session time.
    pub fn write_snapshot(
        &mut self,
        entries: &[InterfaceEntry],
        unit: RateUnit,
        elapsed_secs: u64,
    ) -> Result<()> {
        self.write_line(&format!(
            "*** Interface counters, elapsed time {elapsed_secs} seconds"
        ))?;

        for entry in entries {
            let line = format!(
                "{}: {} total, {} IPv4, {} IPv6, {} non-IP, {} bad IPv4 checksum; activity {:.2} {unit_label}, peak {:.2} {unit_label}",
                entry.name,
                entry.total,
                entry.ipv4_total,
                entry.ipv6_total,
                entry.non_ip_total,
                entry.bad_checksum_total,
                entry.current_rate,
                entry.peak_rate,
                unit_label = unit.label(),
            );
            self.write_line(&line)?;
        }

        Ok(())
    }

    /// Reopens the active path after a rotation request.
    pub fn rotate(&mut self) -> Result<()> {
        self.write_line("*** Rotating log")?;
        self.file = Self::open_file(&self.path)?;
        self.write_line("*** Log file reopened after rotation")?;
        Ok(())
    }
}
