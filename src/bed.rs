//! Bed handles supplied by a SleepIQ client.
//!
//! The client itself (session, polling, API parsing) lives outside this crate.
//! Implement [`SleepIqBed`] on top of it and hand the beds to
//! [`async_setup_entry`](crate::button::async_setup_entry).

use std::{collections::BTreeMap, sync::Arc};

use crate::error::BedError;

/// A remote-controllable Sleep Number bed.
///
/// Handles are shared read-only between every button built for the bed.
#[async_trait::async_trait]
pub trait SleepIqBed: Send + Sync {
    /// Stable bed identifier as reported by the SleepIQ service
    fn id(&self) -> &str;

    /// Display name of the bed
    fn name(&self) -> &str;

    /// Starts a calibration cycle on the bed.
    async fn calibrate(&self) -> Result<(), BedError>;

    /// Stops the air pump.
    async fn stop_pump(&self) -> Result<(), BedError>;
}

/// Source of the beds known to a client session.
pub trait BedCollection {
    /// Returns the beds ordered by bed id.
    fn beds(&self) -> Vec<Arc<dyn SleepIqBed>>;
}

impl BedCollection for BTreeMap<String, Arc<dyn SleepIqBed>> {
    fn beds(&self) -> Vec<Arc<dyn SleepIqBed>> {
        self.values().cloned().collect()
    }
}
