//! Shared test fixtures for integration tests.

use socket_sim::appliances::Appliance;
use socket_sim::room::Room;

/// The demo heater (Peshy Mega heat, 2 kW).
pub fn demo_heater() -> Appliance {
    Appliance::heater("Peshy", "Mega heat", "P MH140-7765d", 2.0).unwrap()
}

/// The demo TV (Sony Mony, 0.25 kW, full brightness).
pub fn demo_tv() -> Appliance {
    Appliance::tv("Sony", "Mony", "SN123", 0.25, 100).unwrap()
}

/// A three-compressor fridge (0.4 kW per compressor).
pub fn demo_fridge() -> Appliance {
    Appliance::fridge("Arctic", "Chill", "F-1", 0.4, 3).unwrap()
}

/// The demo bedroom: 5 sockets, 2.1 kW budget.
pub fn bedroom() -> Room {
    Room::new("Bedroom", 5, 2.1).unwrap()
}
