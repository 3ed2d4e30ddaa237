use std::fmt;

use crate::appliances::kind::ApplianceKind;
use crate::source::SourceId;

/// Standby draw of a TV that is switched off (kW).
pub const TV_STANDBY_KW: f32 = 0.05;

/// Per-kind payload driving the draw formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawModel {
    /// Draws the full rated power when on, nothing when off.
    Heater,
    /// Draws rated power scaled by brightness when on, a fixed standby
    /// draw when off.
    Tv { brightness: u8 },
    /// Draws rated power per compressor when on, nothing when off.
    Fridge { compressors: u32 },
}

impl DrawModel {
    /// Returns the kind tag for this payload.
    pub fn kind(&self) -> ApplianceKind {
        match self {
            DrawModel::Heater => ApplianceKind::Heater,
            DrawModel::Tv { .. } => ApplianceKind::Tv,
            DrawModel::Fridge { .. } => ApplianceKind::Fridge,
        }
    }
}

/// Validation failure when constructing an appliance.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplianceError {
    /// An identity field (`brand`, `model`, or `serial`) was empty.
    EmptyField(&'static str),
    /// Rated power was zero or negative.
    NonPositiveRating(f32),
    /// TV brightness above 100.
    BrightnessOutOfRange(u8),
    /// Fridge with no compressors.
    NoCompressors,
}

impl fmt::Display for ApplianceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplianceError::EmptyField(field) => {
                write!(f, "appliance error: {field} must not be empty")
            }
            ApplianceError::NonPositiveRating(kw) => {
                write!(f, "appliance error: rated power must be > 0, got {kw}")
            }
            ApplianceError::BrightnessOutOfRange(level) => {
                write!(f, "appliance error: brightness must be <= 100, got {level}")
            }
            ApplianceError::NoCompressors => {
                write!(f, "appliance error: fridge needs at least one compressor")
            }
        }
    }
}

/// A device with a fixed power rating that plugs into a capacity-bounded
/// source and switches on and off.
///
/// Identity fields and the rated power are immutable after construction.
/// The attachment handle is mutated only through the
/// [`PowerSource`](crate::source::PowerSource) capability; an appliance
/// without a source is always off.
#[derive(Debug, PartialEq)]
pub struct Appliance {
    brand: String,
    model: String,
    serial: String,
    rated_kw: f32,
    draw: DrawModel,
    is_on: bool,
    source: Option<SourceId>,
}

impl Appliance {
    fn new(
        brand: &str,
        model: &str,
        serial: &str,
        rated_kw: f32,
        draw: DrawModel,
    ) -> Result<Self, ApplianceError> {
        if brand.is_empty() {
            return Err(ApplianceError::EmptyField("brand"));
        }
        if model.is_empty() {
            return Err(ApplianceError::EmptyField("model"));
        }
        if serial.is_empty() {
            return Err(ApplianceError::EmptyField("serial"));
        }
        if rated_kw <= 0.0 {
            return Err(ApplianceError::NonPositiveRating(rated_kw));
        }

        Ok(Self {
            brand: brand.to_string(),
            model: model.to_string(),
            serial: serial.to_string(),
            rated_kw,
            draw,
            is_on: false,
            source: None,
        })
    }

    /// Creates a heater.
    ///
    /// # Errors
    ///
    /// Returns an `ApplianceError` if an identity field is empty or the
    /// rated power is not strictly positive.
    pub fn heater(
        brand: &str,
        model: &str,
        serial: &str,
        rated_kw: f32,
    ) -> Result<Self, ApplianceError> {
        Self::new(brand, model, serial, rated_kw, DrawModel::Heater)
    }

    /// Creates a TV with an initial brightness in `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns an `ApplianceError` on empty identity fields, non-positive
    /// rated power, or brightness above 100.
    pub fn tv(
        brand: &str,
        model: &str,
        serial: &str,
        rated_kw: f32,
        brightness: u8,
    ) -> Result<Self, ApplianceError> {
        if brightness > 100 {
            return Err(ApplianceError::BrightnessOutOfRange(brightness));
        }
        Self::new(brand, model, serial, rated_kw, DrawModel::Tv { brightness })
    }

    /// Creates a fridge with a positive compressor count.
    ///
    /// # Errors
    ///
    /// Returns an `ApplianceError` on empty identity fields, non-positive
    /// rated power, or a zero compressor count.
    pub fn fridge(
        brand: &str,
        model: &str,
        serial: &str,
        rated_kw: f32,
        compressors: u32,
    ) -> Result<Self, ApplianceError> {
        if compressors == 0 {
            return Err(ApplianceError::NoCompressors);
        }
        Self::new(brand, model, serial, rated_kw, DrawModel::Fridge { compressors })
    }

    /// Returns the brand name.
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Returns the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the serial number.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Returns the kind tag.
    pub fn kind(&self) -> ApplianceKind {
        self.draw.kind()
    }

    /// Returns the rated power in kW.
    pub fn rated_kw(&self) -> f32 {
        self.rated_kw
    }

    /// Returns `true` when the appliance is switched on.
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Returns `true` when the appliance is plugged into a source.
    pub fn is_plugged(&self) -> bool {
        self.source.is_some()
    }

    /// Returns the TV brightness, or `None` for other kinds.
    pub fn brightness(&self) -> Option<u8> {
        match self.draw {
            DrawModel::Tv { brightness } => Some(brightness),
            _ => None,
        }
    }

    /// Returns the fridge compressor count, or `None` for other kinds.
    pub fn compressors(&self) -> Option<u32> {
        match self.draw {
            DrawModel::Fridge { compressors } => Some(compressors),
            _ => None,
        }
    }

    /// Returns the current draw in kW.
    ///
    /// Depends only on the on/off state and the kind payload:
    ///
    /// | Kind   | On                        | Off            |
    /// |--------|---------------------------|----------------|
    /// | Heater | rated                     | 0              |
    /// | TV     | rated × brightness / 100  | 0.05 (standby) |
    /// | Fridge | rated × compressors       | 0              |
    pub fn power_kw(&self) -> f32 {
        match self.draw {
            DrawModel::Heater => {
                if self.is_on {
                    self.rated_kw
                } else {
                    0.0
                }
            }
            DrawModel::Tv { brightness } => {
                if self.is_on {
                    self.rated_kw * f32::from(brightness) / 100.0
                } else {
                    TV_STANDBY_KW
                }
            }
            DrawModel::Fridge { compressors } => {
                if self.is_on {
                    self.rated_kw * compressors as f32
                } else {
                    0.0
                }
            }
        }
    }

    /// Sets the TV brightness.
    ///
    /// Soft-rejects (returns `false`) on non-TV appliances and on levels
    /// above 100. Callers that hold the appliance in a room must go through
    /// [`Room::set_brightness`](crate::room::Room::set_brightness) so the
    /// source is notified of the changed draw.
    pub fn set_brightness(&mut self, level: u8) -> bool {
        if level > 100 {
            return false;
        }
        match &mut self.draw {
            DrawModel::Tv { brightness } => {
                *brightness = level;
                true
            }
            _ => false,
        }
    }

    /// Check-then-commit switch-on against a consumption snapshot.
    ///
    /// `current_kw` is the source's total draw including this appliance's
    /// own prior contribution; `max_kw` is the source's budget. Fails
    /// without any state change when already on, unplugged, or when the
    /// recomputed total would strictly exceed the budget.
    pub(crate) fn switch_on_within(&mut self, current_kw: f32, max_kw: f32) -> bool {
        if self.is_on || self.source.is_none() {
            return false;
        }

        let prior_kw = self.power_kw();
        self.is_on = true;
        if current_kw - prior_kw + self.power_kw() > max_kw {
            self.is_on = false;
            return false;
        }
        true
    }

    /// Switches off. Fails only when already off.
    pub(crate) fn switch_off(&mut self) -> bool {
        if !self.is_on {
            return false;
        }
        self.is_on = false;
        true
    }

    /// Registers an attachment point.
    ///
    /// # Panics
    ///
    /// Panics when the appliance is already plugged in. Plugging a plugged
    /// appliance is a contract violation, not a recoverable condition.
    pub(crate) fn attach(&mut self, id: SourceId) {
        assert!(
            self.source.is_none(),
            "appliance {} is already plugged into a source",
            self.serial
        );
        self.source = Some(id);
    }

    /// Clears the attachment point, forcing the appliance off first.
    pub(crate) fn detach(&mut self) {
        self.is_on = false;
        self.source = None;
    }

    pub(crate) fn source(&self) -> Option<SourceId> {
        self.source
    }
}

impl Clone for Appliance {
    /// Duplicates identity and payload; the copy starts off and unplugged
    /// regardless of the original's state.
    fn clone(&self) -> Self {
        Self {
            brand: self.brand.clone(),
            model: self.model.clone(),
            serial: self.serial.clone(),
            rated_kw: self.rated_kw,
            draw: self.draw,
            is_on: false,
            source: None,
        }
    }
}
