use crate::error::Result;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::{LinuxPromisc, LinuxTable};

/// The OS interface table: candidate names plus the narrow calls the
/// registry needs to qualify them.
pub trait SystemTable {
    /// Interface names in table order. May contain duplicates (aliases);
    /// the registry deduplicates.
    fn interface_names(&self) -> Result<Vec<String>>;

    /// Administrative "up" state.
    fn is_up(&self, name: &str) -> bool;

    /// Kernel interface index for a name.
    fn index_of(&self, name: &str) -> Option<u32>;

    /// Name for a kernel interface index.
    fn name_of(&self, index: u32) -> Option<String>;
}

/// Per-interface promiscuous-mode flag access.
pub trait PromiscControl {
    fn get(&self, name: &str) -> Result<bool>;
    fn set(&mut self, name: &str, on: bool) -> Result<()>;
}

pub fn create_table() -> Result<Box<dyn SystemTable>> {
    #[cfg(target_os = "linux")]
    return Ok(Box::new(LinuxTable::new()?));

    #[cfg(not(target_os = "linux"))]
    return Err(crate::error::IfwatchError::Platform(
        "Unsupported platform".to_string(),
    ));
}

pub fn create_promisc_control() -> Result<Box<dyn PromiscControl>> {
    #[cfg(target_os = "linux")]
    return Ok(Box::new(LinuxPromisc::new()?));

    #[cfg(not(target_os = "linux"))]
    return Err(crate::error::IfwatchError::Platform(
        "Unsupported platform".to_string(),
    ));
}

#[cfg(test)]
pub(crate) mod fake {
    use super::{PromiscControl, SystemTable};
    use crate::error::Result;
    use std::collections::{HashMap, HashSet};

    /// In-memory interface table for registry/facility/selection tests.
    pub(crate) struct FakeTable {
        pub rows: Vec<String>,
        pub up: HashSet<String>,
        pub index_map: HashMap<String, u32>,
        pub name_map: HashMap<u32, String>,
    }

    impl FakeTable {
        /// Builds a table from `(name, index, up)` rows. The first row
        /// wins when a name repeats, mirroring kernel alias rows.
        pub(crate) fn new(rows: &[(&str, u32, bool)]) -> Self {
            let mut table = Self {
                rows: Vec::new(),
                up: HashSet::new(),
                index_map: HashMap::new(),
                name_map: HashMap::new(),
            };
            for &(name, index, up) in rows {
                table.rows.push(name.to_string());
                if up {
                    table.up.insert(name.to_string());
                }
                table.index_map.entry(name.to_string()).or_insert(index);
                table.name_map.entry(index).or_insert_with(|| name.to_string());
            }
            table
        }

        /// Registers a name for an index without a table row, like an
        /// interface that appeared after the initial scan.
        pub(crate) fn add_unlisted(&mut self, name: &str, index: u32) {
            self.name_map.insert(index, name.to_string());
        }
    }

    impl SystemTable for FakeTable {
        fn interface_names(&self) -> Result<Vec<String>> {
            Ok(self.rows.clone())
        }

        fn is_up(&self, name: &str) -> bool {
            self.up.contains(name)
        }

        fn index_of(&self, name: &str) -> Option<u32> {
            self.index_map.get(name).copied()
        }

        fn name_of(&self, index: u32) -> Option<String> {
            self.name_map.get(&index).cloned()
        }
    }

    /// Records promiscuous flag reads/writes instead of touching devices.
    #[derive(Default)]
    pub(crate) struct FakePromisc {
        pub flags: HashMap<String, bool>,
        pub set_calls: Vec<(String, bool)>,
    }

    impl PromiscControl for FakePromisc {
        fn get(&self, name: &str) -> Result<bool> {
            Ok(self.flags.get(name).copied().unwrap_or(false))
        }

        fn set(&mut self, name: &str, on: bool) -> Result<()> {
            self.flags.insert(name.to_string(), on);
            self.set_calls.push((name.to_string(), on));
            Ok(())
        }
    }
}
