//! Room: a socket panel with a power budget, admission control, and a
//! one-way breaker.
//!
//! A room exclusively owns the appliances plugged into it and is the only
//! [`PowerSource`] in the crate. Whenever an attached appliance's draw
//! changes the room re-checks the total against its budget; exceeding the
//! budget trips the breaker, which drops every appliance and permanently
//! zeroes the socket capacity. The breaker never resets in software.

use std::fmt;

use crate::appliances::{Appliance, ApplianceKind, KindSet};
use crate::source::{PowerSource, SourceId};

/// Display length the room name is truncated to.
pub const NAME_DISPLAY_LEN: usize = 30;

/// Validation failure when constructing a room.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomError {
    /// Power budget was zero or negative.
    NonPositiveBudget(f32),
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomError::NonPositiveBudget(kw) => {
                write!(f, "room error: power budget must be > 0, got {kw}")
            }
        }
    }
}

/// A capacity-bounded socket panel.
#[derive(Debug)]
pub struct Room {
    name: String,
    sockets: Vec<Appliance>,
    max_sockets: usize,
    max_kw: f32,
    tripped: bool,
    forbidden: KindSet,
    id: SourceId,
}

impl Room {
    /// Creates a room with a fixed socket count and power budget.
    ///
    /// # Errors
    ///
    /// Returns a `RoomError` if `max_kw` is not strictly positive.
    pub fn new(name: &str, max_sockets: usize, max_kw: f32) -> Result<Self, RoomError> {
        if max_kw <= 0.0 {
            return Err(RoomError::NonPositiveBudget(max_kw));
        }

        let mut room = Self {
            name: String::new(),
            sockets: Vec::with_capacity(max_sockets),
            max_sockets,
            max_kw,
            tripped: false,
            forbidden: KindSet::new(),
            id: SourceId::next(),
        };
        room.set_name(name);
        Ok(room)
    }

    /// Returns the room name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the room, truncating to [`NAME_DISPLAY_LEN`] characters.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.chars().take(NAME_DISPLAY_LEN).collect();
    }

    /// Returns the number of plugged appliances.
    pub fn appliance_count(&self) -> usize {
        self.sockets.len()
    }

    /// Returns the socket capacity. Zero once the breaker has tripped.
    pub fn max_sockets(&self) -> usize {
        self.max_sockets
    }

    /// Returns `true` once the breaker has tripped.
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    /// Returns the admission kind policy.
    pub fn forbidden_kinds(&self) -> KindSet {
        self.forbidden
    }

    /// Forbids a kind. Checked only at admission; appliances of the kind
    /// already plugged in stay plugged in.
    pub fn add_forbidden(&mut self, kind: ApplianceKind) {
        self.forbidden.insert(kind);
    }

    /// Lifts the ban on a kind.
    pub fn clear_forbidden(&mut self, kind: ApplianceKind) {
        self.forbidden.remove(kind);
    }

    /// Returns the plugged appliances in admission order (removal may
    /// reorder: the last appliance swaps into the removed slot).
    pub fn appliances(&self) -> &[Appliance] {
        &self.sockets
    }

    /// Looks up a plugged appliance by serial number.
    pub fn get(&self, serial: &str) -> Option<&Appliance> {
        self.sockets.iter().find(|a| a.serial() == serial)
    }

    fn position(&self, serial: &str) -> Option<usize> {
        self.sockets.iter().position(|a| a.serial() == serial)
    }

    /// Admits a copy of the appliance.
    ///
    /// The appliance is cloned (the copy starts off and unplugged), plugged
    /// into this room, and inserted. Soft-rejects with `false` when the
    /// breaker has tripped, every socket is taken, the kind is forbidden,
    /// or the serial is already plugged in; the room is left unchanged.
    /// The plug-in notification re-validates the pre-insertion total, so
    /// it can trip the breaker itself (accumulated standby draw can sit
    /// over budget until the next notification); the admission is then
    /// refused and the room ends empty and tripped.
    pub fn add_appliance(&mut self, appliance: &Appliance) -> bool {
        if self.tripped || self.sockets.len() >= self.max_sockets {
            log::debug!(
                "room \"{}\": rejecting {} (no socket available)",
                self.name,
                appliance.serial()
            );
            return false;
        }
        if self.forbidden.contains(appliance.kind()) {
            log::debug!(
                "room \"{}\": rejecting {} ({} is forbidden)",
                self.name,
                appliance.serial(),
                appliance.kind().name()
            );
            return false;
        }
        if self.position(appliance.serial()).is_some() {
            log::debug!(
                "room \"{}\": rejecting duplicate serial {}",
                self.name,
                appliance.serial()
            );
            return false;
        }

        let mut copy = appliance.clone();
        // Plugging in notifies before insertion, so the re-validated total
        // covers the previously plugged appliances only.
        self.plug_in(&mut copy);
        if self.tripped {
            // The notification found the panel over budget and tripped;
            // a tripped room holds nothing, so the newcomer stays out.
            return false;
        }
        self.sockets.push(copy);
        true
    }

    /// Unplugs and removes the appliance with the given serial.
    ///
    /// Returns the detached appliance (off, unplugged), or `None` for an
    /// unknown serial. The last appliance swaps into the freed slot.
    pub fn remove_appliance(&mut self, serial: &str) -> Option<Appliance> {
        let pos = self.position(serial)?;
        let mut removed = self.sockets.swap_remove(pos);
        self.unplug(&mut removed);
        Some(removed)
    }

    /// Switches an appliance on, admission-checked.
    ///
    /// Recomputes the total draw with the appliance's new contribution and
    /// soft-rejects when it would strictly exceed the budget, when the
    /// appliance is already on, or for an unknown serial. A failed attempt
    /// fires no notification, so it can never trip the breaker; a
    /// successful one notifies as usual.
    pub fn turn_on(&mut self, serial: &str) -> bool {
        let current_kw = self.current_consumption_kw();
        let max_kw = self.max_kw;
        let Some(pos) = self.position(serial) else {
            return false;
        };
        if self.sockets[pos].switch_on_within(current_kw, max_kw) {
            self.consumption_changed();
            true
        } else {
            false
        }
    }

    /// Switches an appliance off. Fails for unknown serials and when the
    /// appliance is already off.
    pub fn turn_off(&mut self, serial: &str) -> bool {
        let Some(pos) = self.position(serial) else {
            return false;
        };
        if self.sockets[pos].switch_off() {
            self.consumption_changed();
            true
        } else {
            false
        }
    }

    /// Reconfigures a plugged TV's brightness.
    ///
    /// Soft-rejects for unknown serials, non-TV appliances, and levels
    /// above 100. A successful change notifies the room, so raising the
    /// brightness of a running TV can trip the breaker.
    pub fn set_brightness(&mut self, serial: &str, level: u8) -> bool {
        let Some(pos) = self.position(serial) else {
            return false;
        };
        if self.sockets[pos].set_brightness(level) {
            self.consumption_changed();
            true
        } else {
            false
        }
    }
}

impl PowerSource for Room {
    /// Breaker check: a total draw strictly above the budget drops every
    /// appliance, zeroes the socket capacity, and latches the tripped
    /// flag. Irreversible; the physical breaker resets out-of-band.
    fn consumption_changed(&mut self) {
        let total_kw = self.current_consumption_kw();
        if total_kw > self.max_kw {
            log::warn!(
                "room \"{}\" tripped: {:.3} kW draw exceeds {:.3} kW budget",
                self.name,
                total_kw,
                self.max_kw
            );
            self.sockets.clear();
            self.max_sockets = 0;
            self.tripped = true;
        }
    }

    fn current_consumption_kw(&self) -> f32 {
        self.sockets.iter().map(Appliance::power_kw).sum()
    }

    fn max_consumption_kw(&self) -> f32 {
        self.max_kw
    }

    fn source_id(&self) -> SourceId {
        self.id
    }
}

impl Clone for Room {
    /// Copies the panel by re-running admission.
    ///
    /// Name, budget, policy, tripped flag, and socket capacity are copied
    /// directly; every held appliance is then re-admitted through
    /// [`Room::add_appliance`] (capacity and policy checks re-run) and
    /// switched back on where the original was on. Because the copy replays
    /// the admission path rather than the raw state, its on/off set can
    /// diverge from the original under budget pressure; that is accepted
    /// behavior.
    fn clone(&self) -> Self {
        let mut copy = Self {
            name: self.name.clone(),
            sockets: Vec::with_capacity(self.max_sockets),
            max_sockets: self.max_sockets,
            max_kw: self.max_kw,
            tripped: self.tripped,
            forbidden: self.forbidden,
            id: SourceId::next(),
        };
        for appliance in &self.sockets {
            if copy.add_appliance(appliance) && appliance.is_on() {
                copy.turn_on(appliance.serial());
            }
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appliances::TV_STANDBY_KW;

    fn heater(serial: &str, kw: f32) -> Appliance {
        Appliance::heater("Peshy", "Mega heat", serial, kw).unwrap()
    }

    fn tv(serial: &str) -> Appliance {
        Appliance::tv("Sony", "Mony", serial, 0.25, 100).unwrap()
    }

    #[test]
    fn new_room_rejects_non_positive_budget() {
        assert_eq!(
            Room::new("Bedroom", 5, 0.0).unwrap_err(),
            RoomError::NonPositiveBudget(0.0)
        );
        assert!(Room::new("Bedroom", 5, -1.0).is_err());
    }

    #[test]
    fn name_is_truncated_for_display() {
        let long = "a".repeat(NAME_DISPLAY_LEN + 10);
        let room = Room::new(&long, 1, 1.0).unwrap();
        assert_eq!(room.name().chars().count(), NAME_DISPLAY_LEN);
    }

    #[test]
    fn admission_clones_and_plugs_in() {
        let mut room = Room::new("Bedroom", 5, 2.1).unwrap();
        let original = heater("H-1", 2.0);
        assert!(room.add_appliance(&original));

        // Original untouched; the room holds a plugged copy.
        assert!(!original.is_plugged());
        let held = room.get("H-1").unwrap();
        assert!(held.is_plugged());
        assert!(!held.is_on());
        assert_eq!(room.appliance_count(), 1);
    }

    #[test]
    fn turn_on_within_budget_succeeds() {
        // Scenario: heater rated 2.0 against a 2.1 kW budget
        let mut room = Room::new("Bedroom", 5, 2.1).unwrap();
        room.add_appliance(&heater("H-1", 2.0));
        assert!(room.turn_on("H-1"));
        assert!((room.current_consumption_kw() - 2.0).abs() < 1e-6);
        assert!(!room.is_tripped());
    }

    #[test]
    fn second_heater_is_refused_without_tripping() {
        let mut room = Room::new("Bedroom", 5, 2.1).unwrap();
        room.add_appliance(&heater("H-1", 2.0));
        room.add_appliance(&heater("H-2", 2.0));
        assert!(room.turn_on("H-1"));

        // 2 + 2 = 4 kW > 2.1 kW: the attempt fails and fires no
        // notification, so the breaker stays closed.
        assert!(!room.turn_on("H-2"));
        assert!(!room.is_tripped());
        assert_eq!(room.appliance_count(), 2);
        assert!(!room.get("H-2").unwrap().is_on());
        assert!((room.current_consumption_kw() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn consumption_is_sum_of_held_draws() {
        let mut room = Room::new("Den", 5, 10.0).unwrap();
        room.add_appliance(&heater("H-1", 2.0));
        room.add_appliance(&tv("TV-1"));
        room.add_appliance(&Appliance::fridge("Arctic", "Chill", "F-1", 0.4, 3).unwrap());

        // All off: only the TV standby draw counts.
        assert!((room.current_consumption_kw() - TV_STANDBY_KW).abs() < 1e-6);

        room.turn_on("H-1");
        room.turn_on("TV-1");
        room.turn_on("F-1");
        let expected = 2.0 + 0.25 + 1.2;
        assert!((room.current_consumption_kw() - expected).abs() < 1e-5);

        room.turn_off("TV-1");
        assert!((room.current_consumption_kw() - (2.0 + TV_STANDBY_KW + 1.2)).abs() < 1e-5);
    }

    #[test]
    fn forbidden_kind_is_rejected_at_admission_only() {
        let mut room = Room::new("Bedroom", 5, 5.0).unwrap();
        room.add_appliance(&tv("TV-1"));
        room.add_forbidden(ApplianceKind::Tv);

        // Already-held TVs stay; new ones are refused.
        assert!(!room.add_appliance(&tv("TV-2")));
        assert_eq!(room.appliance_count(), 1);

        room.clear_forbidden(ApplianceKind::Tv);
        assert!(room.add_appliance(&tv("TV-2")));
    }

    #[test]
    fn capacity_limits_admission() {
        let mut room = Room::new("Closet", 1, 5.0).unwrap();
        assert!(room.add_appliance(&heater("H-1", 1.0)));
        assert!(!room.add_appliance(&heater("H-2", 1.0)));
        assert_eq!(room.appliance_count(), 1);
    }

    #[test]
    fn duplicate_serial_is_rejected() {
        let mut room = Room::new("Den", 5, 5.0).unwrap();
        assert!(room.add_appliance(&heater("H-1", 1.0)));
        assert!(!room.add_appliance(&heater("H-1", 1.0)));
        assert_eq!(room.appliance_count(), 1);
    }

    #[test]
    fn remove_by_unknown_serial_is_a_noop() {
        let mut room = Room::new("Den", 5, 5.0).unwrap();
        room.add_appliance(&heater("H-1", 1.0));
        assert!(room.remove_appliance("nope").is_none());
        assert_eq!(room.appliance_count(), 1);
    }

    #[test]
    fn removed_appliance_comes_back_off_and_unplugged() {
        let mut room = Room::new("Den", 5, 5.0).unwrap();
        room.add_appliance(&heater("H-1", 1.0));
        room.turn_on("H-1");

        let removed = room.remove_appliance("H-1").unwrap();
        assert!(!removed.is_on());
        assert!(!removed.is_plugged());
        assert_eq!(room.appliance_count(), 0);
        assert_eq!(room.current_consumption_kw(), 0.0);
    }

    #[test]
    fn toggles_on_unknown_serials_fail() {
        let mut room = Room::new("Den", 5, 5.0).unwrap();
        assert!(!room.turn_on("ghost"));
        assert!(!room.turn_off("ghost"));
        assert!(!room.set_brightness("ghost", 10));
    }

    #[test]
    fn brightness_raise_can_trip_the_breaker() {
        let mut room = Room::new("Guestroom", 5, 2.1).unwrap();
        room.add_appliance(&heater("H-1", 2.0));
        let mut dim_tv = tv("TV-1");
        dim_tv.set_brightness(20);
        room.add_appliance(&dim_tv);

        assert!(room.turn_on("TV-1")); // 0.05 kW at brightness 20
        assert!(room.turn_on("H-1")); // total 2.05 <= 2.1

        // Full brightness pushes the TV to 0.25 kW: 2.25 > 2.1 trips.
        assert!(room.set_brightness("TV-1", 100));
        assert!(room.is_tripped());
        assert_eq!(room.appliance_count(), 0);
        assert_eq!(room.max_sockets(), 0);
    }

    #[test]
    fn failed_turn_on_never_trips() {
        let mut room = Room::new("Trip", 5, 2.1).unwrap();
        room.add_appliance(&heater("H-1", 2.0));
        room.add_appliance(&tv("TV-1"));
        room.turn_on("H-1");

        assert!(!room.turn_on("TV-1")); // 2.0 + 0.25 > 2.1, refused
        assert!(!room.is_tripped());
        assert_eq!(room.appliance_count(), 2);
    }

    #[test]
    fn tripped_room_refuses_all_future_admissions() {
        let mut room = Room::new("Loaded", 5, 2.1).unwrap();
        let mut dim = tv("TV-1");
        dim.set_brightness(20);
        room.add_appliance(&heater("H-1", 2.0));
        room.add_appliance(&dim);
        room.turn_on("H-1");
        room.turn_on("TV-1");
        room.set_brightness("TV-1", 100);
        assert!(room.is_tripped());

        // Trip idempotence: admissions and toggles are no-ops forever after.
        assert!(!room.add_appliance(&heater("H-2", 0.1)));
        assert_eq!(room.appliance_count(), 0);
        assert_eq!(room.max_sockets(), 0);
        assert!(!room.turn_on("H-1"));
        assert!(room.is_tripped());
    }

    #[test]
    fn standby_draw_can_exceed_budget_until_next_notification() {
        // Admission validates the pre-insertion total, so standby draw can
        // push the panel over budget with the breaker still closed.
        let mut room = Room::new("Standby", 5, 0.07).unwrap();
        assert!(room.add_appliance(&tv("TV-1")));
        assert!(room.add_appliance(&tv("TV-2"))); // notification saw 0.05
        assert!(!room.is_tripped());
        assert!(room.current_consumption_kw() > room.max_consumption_kw());

        // The next successful operation notifies and trips.
        assert!(room.set_brightness("TV-1", 50));
        assert!(room.is_tripped());
        assert_eq!(room.appliance_count(), 0);
    }

    #[test]
    fn admission_that_trips_during_plug_in_is_refused() {
        let mut room = Room::new("Standby", 5, 0.07).unwrap();
        room.add_appliance(&tv("TV-1"));
        room.add_appliance(&tv("TV-2")); // 0.10 kW standby, over budget

        // The third plug-in notification sees 0.10 > 0.07 and trips; the
        // newcomer must not be inserted.
        assert!(!room.add_appliance(&tv("TV-3")));
        assert!(room.is_tripped());
        assert_eq!(room.appliance_count(), 0);
        assert_eq!(room.max_sockets(), 0);
        assert!(!room.turn_on("TV-3"));
    }

    #[test]
    fn clone_replays_admission_and_on_state() {
        let mut room = Room::new("Bedroom", 5, 2.1).unwrap();
        room.add_forbidden(ApplianceKind::Fridge);
        room.add_appliance(&heater("H-1", 2.0));
        room.turn_on("H-1");

        let copy = room.clone();
        assert_eq!(copy.name(), "Bedroom");
        assert_eq!(copy.appliance_count(), 1);
        assert!(copy.get("H-1").unwrap().is_on());
        assert!(copy.forbidden_kinds().contains(ApplianceKind::Fridge));
        assert!((copy.current_consumption_kw() - 2.0).abs() < 1e-6);

        // Independent panels: toggling the copy leaves the original alone.
        let mut copy = copy;
        copy.turn_off("H-1");
        assert!(room.get("H-1").unwrap().is_on());
    }

    #[test]
    fn clone_drops_appliances_of_newly_forbidden_kinds() {
        let mut room = Room::new("Den", 5, 5.0).unwrap();
        room.add_appliance(&tv("TV-1"));
        // Forbid after admission: the original keeps its TV, the copy's
        // re-run admission refuses it.
        room.add_forbidden(ApplianceKind::Tv);
        assert_eq!(room.appliance_count(), 1);

        let copy = room.clone();
        assert_eq!(copy.appliance_count(), 0);
    }

    #[test]
    fn assignment_via_clone_replaces_state() {
        let mut bedroom = Room::new("Bedroom", 5, 2.1).unwrap();
        bedroom.add_appliance(&heater("H-1", 2.0));

        let mut guestroom = Room::new("Guestroom", 3, 1.0).unwrap();
        guestroom.clone_from(&bedroom);
        assert_eq!(guestroom.name(), "Bedroom");
        assert_eq!(guestroom.appliance_count(), 1);
        assert_eq!(guestroom.max_sockets(), 5);
    }
}
