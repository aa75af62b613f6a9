use crate::error::{IfwatchError, Result};
use crate::platform::SystemTable;
use std::collections::HashMap;

/// Live counters for one discovered interface.
///
/// Counters are monotonic for the process lifetime and saturate instead
/// of wrapping; absolute counts are not persisted across runs.
#[derive(Debug, Clone)]
pub struct InterfaceEntry {
    pub name: String,
    /// Kernel-assigned interface index, the true uniqueness key.
    pub if_index: u32,
    /// 1-based ordinal at insertion time; never renumbered.
    pub display_index: u32,

    pub total: u64,
    pub ipv4_total: u64,
    pub ipv6_total: u64,
    pub non_ip_total: u64,
    pub bad_checksum_total: u64,

    /// Bytes since the last rate tick; reset each tick.
    pub span_bytes: u64,
    /// Bytes since startup; never reset.
    pub bytes_accumulated: u64,

    pub current_rate: f64,
    pub peak_rate: f64,
}

impl InterfaceEntry {
    fn new(name: String, if_index: u32, display_index: u32) -> Self {
        Self {
            name,
            if_index,
            display_index,
            total: 0,
            ipv4_total: 0,
            ipv6_total: 0,
            non_ip_total: 0,
            bad_checksum_total: 0,
            span_bytes: 0,
            bytes_accumulated: 0,
            current_rate: 0.0,
            peak_rate: 0.0,
        }
    }
}

/// Ordered set of monitored interfaces.
///
/// Entries live in a growable arena in discovery order, with an
/// `if_index → slot` map on the side; because entries are never removed,
/// `display_index == slot + 1` holds for every entry and windowed
/// scrolling is plain index arithmetic.
pub struct InterfaceRegistry {
    entries: Vec<InterfaceEntry>,
    by_index: HashMap<u32, usize>,
}

impl InterfaceRegistry {
    /// Enumerates the system interface table and keeps what qualifies:
    /// non-empty names not already present (alias rows share a name),
    /// administratively up, and resolvable to a kernel index.
    pub fn discover(table: &dyn SystemTable) -> Result<Self> {
        let mut registry = Self {
            entries: Vec::new(),
            by_index: HashMap::new(),
        };

        for name in table.interface_names()? {
            if name.is_empty() || registry.contains_name(&name) {
                continue;
            }
            if !table.is_up(&name) {
                continue;
            }
            let Some(if_index) = table.index_of(&name) else {
                continue;
            };
            registry.push(name, if_index);
        }

        if registry.entries.is_empty() {
            return Err(IfwatchError::NoInterfaces);
        }

        Ok(registry)
    }

    fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    fn push(&mut self, name: String, if_index: u32) -> usize {
        let slot = self.entries.len();
        let display_index = slot as u32 + 1;
        self.entries
            .push(InterfaceEntry::new(name, if_index, display_index));
        self.by_index.insert(if_index, slot);
        slot
    }

    /// Finds the entry for a kernel index, creating one for an index
    /// first seen mid-run (hot-plugged or newly brought up). Returns
    /// `None` when a genuinely new index has no resolvable name; the
    /// caller drops that packet and keeps running.
    pub fn resolve(&mut self, if_index: u32, table: &dyn SystemTable) -> Option<&mut InterfaceEntry> {
        if let Some(&slot) = self.by_index.get(&if_index) {
            return self.entries.get_mut(slot);
        }

        let name = table.name_of(if_index)?;
        let slot = self.push(name, if_index);
        self.entries.get_mut(slot)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&InterfaceEntry> {
        self.entries.get(slot)
    }

    pub fn entries(&self) -> &[InterfaceEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [InterfaceEntry] {
        &mut self.entries
    }

    /// Interface names in discovery order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }
}
