//! Per-station accumulators.
//!
//! A [`CaptureScope`] lives as long as one capture file and owns every
//! [`StationInfo`] created in it. Station records are only reachable through
//! the scope, so dropping the scope releases all of them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hardware address identifying a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationAddress(pub [u8; 6]);

impl fmt::Display for StationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Configuration data accumulated for one station.
///
/// The element type is chosen by the dissector that fills the lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationInfo<T> {
    pub iocs_data_in: Vec<T>,
    pub iocs_data_out: Vec<T>,
    pub ioobject_data_in: Vec<T>,
    pub ioobject_data_out: Vec<T>,
    pub diff_module: Vec<T>,
}

impl<T> StationInfo<T> {
    pub fn new() -> Self {
        Self {
            iocs_data_in: Vec::new(),
            iocs_data_out: Vec::new(),
            ioobject_data_in: Vec::new(),
            ioobject_data_out: Vec::new(),
            diff_module: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iocs_data_in.is_empty()
            && self.iocs_data_out.is_empty()
            && self.ioobject_data_in.is_empty()
            && self.ioobject_data_out.is_empty()
            && self.diff_module.is_empty()
    }
}

impl<T> Default for StationInfo<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Station records for one capture.
#[derive(Debug)]
pub struct CaptureScope<T> {
    stations: HashMap<StationAddress, StationInfo<T>>,
    order: Vec<StationAddress>,
}

impl<T> CaptureScope<T> {
    pub fn new() -> Self {
        Self {
            stations: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Allocate fresh, empty lists for `address`.
    ///
    /// Calling this again for a known station re-initializes it; the previous
    /// lists are dropped.
    ///
    /// # Examples
    /// ```
    /// use pnfield_core::{CaptureScope, StationAddress};
    ///
    /// let mut scope: CaptureScope<u32> = CaptureScope::new();
    /// let station = scope.init_station(StationAddress([0, 0x0e, 0x8c, 1, 2, 3]));
    /// station.iocs_data_in.push(7);
    /// assert_eq!(scope.len(), 1);
    /// ```
    pub fn init_station(&mut self, address: StationAddress) -> &mut StationInfo<T> {
        if !self.stations.contains_key(&address) {
            self.order.push(address);
        }
        debug!(station = %address, "station initialized");
        let slot = self.stations.entry(address).or_default();
        *slot = StationInfo::new();
        slot
    }

    pub fn station(&self, address: &StationAddress) -> Option<&StationInfo<T>> {
        self.stations.get(address)
    }

    pub fn station_mut(&mut self, address: &StationAddress) -> Option<&mut StationInfo<T>> {
        self.stations.get_mut(address)
    }

    pub fn contains(&self, address: &StationAddress) -> bool {
        self.stations.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Stations in the order they were first initialized.
    pub fn stations(&self) -> impl Iterator<Item = (&StationAddress, &StationInfo<T>)> {
        self.order
            .iter()
            .filter_map(|address| self.stations.get(address).map(|info| (address, info)))
    }
}

impl<T> Default for CaptureScope<T> {
    fn default() -> Self {
        Self::new()
    }
}
