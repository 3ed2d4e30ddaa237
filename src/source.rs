//! Power-source capability: consumption tracking plus the shared
//! attach/detach protocol.
//!
//! An appliance never mutates its own attachment handle; the only sanctioned
//! path is [`PowerSource::plug_in`] and [`PowerSource::unplug`], which keep
//! the source notified of every topology change.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::appliances::Appliance;

/// Opaque handle identifying an attachment point.
///
/// Appliances store this instead of a back-reference to the source that
/// holds them, keeping ownership strictly tree-shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    /// Allocates a fresh process-unique handle.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SourceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Capability contract for anything appliances can plug into.
pub trait PowerSource {
    /// Invoked whenever an attached appliance's draw could have changed:
    /// on toggle, on reconfiguration, and on plug/unplug.
    fn consumption_changed(&mut self);

    /// Returns the total draw of every attached appliance in kW.
    fn current_consumption_kw(&self) -> f32;

    /// Returns the power budget in kW.
    fn max_consumption_kw(&self) -> f32;

    /// Returns the handle appliances record while attached here.
    fn source_id(&self) -> SourceId;

    /// Registers this source as the appliance's attachment point and fires
    /// a consumption-changed notification. The notification is intentional
    /// even though a freshly plugged appliance is off: every topology
    /// change re-validates the total draw.
    ///
    /// # Panics
    ///
    /// Panics when the appliance is already plugged in, here or elsewhere.
    fn plug_in(&mut self, appliance: &mut Appliance) {
        appliance.attach(self.source_id());
        self.consumption_changed();
    }

    /// Unplugs the appliance, forcing it off first, and fires a
    /// consumption-changed notification covering the remaining draw.
    fn unplug(&mut self, appliance: &mut Appliance) {
        debug_assert_eq!(appliance.source(), Some(self.source_id()));
        appliance.detach();
        self.consumption_changed();
    }
}
