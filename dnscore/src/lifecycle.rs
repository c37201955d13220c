//! Zone lifecycle: the state machine a zone moves through around the
//! immutable [`crate::zonedb::ZoneDb`] snapshots it holds, and the trait
//! describing how an outer driver feeds it.
//!
//! This is an interface only. Network I/O, SOA-refresh timer arithmetic, and
//! the AXFR/IXFR wire streaming itself are external collaborators (the
//! resolver/transfer layer this core is embedded in), not part of the
//! database core — the trait exists so `ZoneDb::new_version`/`close_version`
//! have a caller-shaped contract to sit behind.

use crate::error::ZoneLifecycleError;
use crate::zonedb::ZoneDb;
use std::sync::Arc;

/// Where a zone currently stands relative to its authoritative source.
#[derive(Debug, Clone)]
pub enum ZoneState {
    /// No zone data has been loaded yet.
    Unloaded,
    /// Serving `current`; `expire` timer (if secondary) has not elapsed.
    Loaded { current: Arc<ZoneDb> },
    /// The refresh/retry/expire window elapsed without a successful
    /// transfer; `stale` is retained only until a successful reload
    /// replaces it, per the "prior version remains current on failure"
    /// invariant master/slave zones share.
    Expired { stale: Arc<ZoneDb> },
}

/// What drives a zone through [`ZoneState`]. Implementors own the network
/// I/O (initial load, periodic SOA-refresh polling, inbound/outbound
/// transfers, NOTIFY handling); this core only needs the shape of the
/// contract, not a working implementation.
pub trait ZoneDriver {
    /// Parse and load a zone from its master-file or initial-transfer
    /// source, replacing any current data. On a parse failure the prior
    /// version must remain current — never leave the zone `Unloaded` once
    /// it has successfully loaded at least once.
    fn load(&mut self) -> Result<(), ZoneLifecycleError>;

    /// Poll the zone's SOA to decide whether a transfer is needed, per the
    /// refresh/retry/expire timers in the zone's SOA rdata.
    fn refresh(&mut self) -> Result<(), ZoneLifecycleError>;

    /// Pull a full or incremental transfer from a primary.
    fn transfer_in(&mut self) -> Result<(), ZoneLifecycleError>;

    /// Handle an inbound NOTIFY, typically triggering an out-of-schedule
    /// `refresh`.
    fn notify(&mut self) -> Result<(), ZoneLifecycleError>;

    /// Serve a full or incremental transfer out to a secondary.
    fn xfer_out(&mut self) -> Result<(), ZoneLifecycleError>;

    /// Move `Loaded` to `Expired` once the SOA expire timer elapses with no
    /// successful refresh.
    fn expire(&mut self) -> Result<(), ZoneLifecycleError>;
}

/// A driver that has not been wired up to an actual transport; every method
/// reports the operation as an external collaborator. Useful as a default
/// for zones that are loaded once from a master file and never refreshed
/// (the only mode the CLI in this crate exercises).
#[derive(Debug, Default)]
pub struct UnimplementedDriver;

impl ZoneDriver for UnimplementedDriver {
    fn load(&mut self) -> Result<(), ZoneLifecycleError> {
        Err(ZoneLifecycleError::NotImplemented("zone transport load"))
    }

    fn refresh(&mut self) -> Result<(), ZoneLifecycleError> {
        Err(ZoneLifecycleError::NotImplemented("SOA refresh polling"))
    }

    fn transfer_in(&mut self) -> Result<(), ZoneLifecycleError> {
        Err(ZoneLifecycleError::NotImplemented("AXFR/IXFR inbound transfer"))
    }

    fn notify(&mut self) -> Result<(), ZoneLifecycleError> {
        Err(ZoneLifecycleError::NotImplemented("NOTIFY handling"))
    }

    fn xfer_out(&mut self) -> Result<(), ZoneLifecycleError> {
        Err(ZoneLifecycleError::NotImplemented("AXFR/IXFR outbound transfer"))
    }

    fn expire(&mut self) -> Result<(), ZoneLifecycleError> {
        Err(ZoneLifecycleError::NotImplemented("SOA expire timer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unimplemented_driver_reports_not_implemented() {
        let mut driver = UnimplementedDriver;
        assert!(matches!(driver.load(), Err(ZoneLifecycleError::NotImplemented(_))));
        assert!(matches!(driver.refresh(), Err(ZoneLifecycleError::NotImplemented(_))));
    }

    #[test]
    fn state_starts_unloaded() {
        let state = ZoneState::Unloaded;
        assert!(matches!(state, ZoneState::Unloaded));
    }
}
