//! Appliance kind tags and the kind-policy set used for admission control.

/// Closed set of appliance kinds handled by the simulator.
///
/// Adding a variant here extends every `match` over kinds, so the compiler
/// flags each dispatch site that needs a new arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplianceKind {
    Heater,
    Tv,
    Fridge,
}

impl ApplianceKind {
    /// All kinds, in declaration order.
    pub const ALL: [ApplianceKind; 3] =
        [ApplianceKind::Heater, ApplianceKind::Tv, ApplianceKind::Fridge];

    /// Returns the stable lowercase name used in configs and journals.
    pub fn name(self) -> &'static str {
        match self {
            ApplianceKind::Heater => "heater",
            ApplianceKind::Tv => "tv",
            ApplianceKind::Fridge => "fridge",
        }
    }

    /// Parses a kind from its config name.
    pub fn from_name(name: &str) -> Option<ApplianceKind> {
        match name {
            "heater" => Some(ApplianceKind::Heater),
            "tv" => Some(ApplianceKind::Tv),
            "fridge" => Some(ApplianceKind::Fridge),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            ApplianceKind::Heater => 0,
            ApplianceKind::Tv => 1,
            ApplianceKind::Fridge => 2,
        }
    }
}

/// Set of appliance kinds with O(1) membership tests.
///
/// Used by [`crate::room::Room`] as the forbidden-kind policy checked at
/// admission time. Empty by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindSet {
    members: [bool; ApplianceKind::ALL.len()],
}

impl KindSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a kind to the set.
    pub fn insert(&mut self, kind: ApplianceKind) {
        self.members[kind.index()] = true;
    }

    /// Removes a kind from the set.
    pub fn remove(&mut self, kind: ApplianceKind) {
        self.members[kind.index()] = false;
    }

    /// Returns `true` when the kind is a member.
    pub fn contains(&self, kind: ApplianceKind) -> bool {
        self.members[kind.index()]
    }

    /// Returns `true` when no kind is a member.
    pub fn is_empty(&self) -> bool {
        !self.members.iter().any(|&m| m)
    }
}
