//! Capability flags: the behavioural facets of a compiled device.
//!
//! Capabilities come from two sources: the device class (protocol family)
//! and the device type itself. Both are static tables; a device's flags are
//! computed once at compilation and never change afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One behavioural facet of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Blind / roller-shutter motor.
    Shutter,
    /// The window itself; anchors a window assembly.
    WindowFrame,
    /// Window handle sensor.
    Handle,
    /// Glass-break / vibration sensor.
    Vibration,
    /// Magnetic door/window contact.
    MagnetContact,
    /// Discrete motion sensor.
    Motion,
    /// Coarse presence sensor.
    Presence,
    /// Push button or rocker.
    Button,
    /// Switchable lamp.
    Lamp,
    /// Dimmable lamp.
    DimmableLamp,
    /// Switchable plug.
    Plug,
    /// Colour LED lamp.
    Led,
    /// Speaker (self-registering).
    Speaker,
    /// Air conditioner (self-registering).
    AirConditioner,
    /// Ambient LED strip.
    LedStrip,
    /// Smoke detector.
    SmokeDetector,
    /// Water-leak detector.
    WaterDetector,
    /// Heating valve actuator.
    HeaterActuator,
    /// Reports temperature.
    Temperature,
    /// Reports humidity.
    Humidity,
    /// Must be registered with the runtime's managed device registry.
    ManagedRegistry,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::Shutter,
        Self::WindowFrame,
        Self::Handle,
        Self::Vibration,
        Self::MagnetContact,
        Self::Motion,
        Self::Presence,
        Self::Button,
        Self::Lamp,
        Self::DimmableLamp,
        Self::Plug,
        Self::Led,
        Self::Speaker,
        Self::AirConditioner,
        Self::LedStrip,
        Self::SmokeDetector,
        Self::WaterDetector,
        Self::HeaterActuator,
        Self::Temperature,
        Self::Humidity,
        Self::ManagedRegistry,
    ];

    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shutter => "shutter",
            Self::WindowFrame => "window_frame",
            Self::Handle => "handle",
            Self::Vibration => "vibration",
            Self::MagnetContact => "magnet_contact",
            Self::Motion => "motion",
            Self::Presence => "presence",
            Self::Button => "button",
            Self::Lamp => "lamp",
            Self::DimmableLamp => "dimmable_lamp",
            Self::Plug => "plug",
            Self::Led => "led",
            Self::Speaker => "speaker",
            Self::AirConditioner => "air_conditioner",
            Self::LedStrip => "led_strip",
            Self::SmokeDetector => "smoke_detector",
            Self::WaterDetector => "water_detector",
            Self::HeaterActuator => "heater_actuator",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::ManagedRegistry => "managed_registry",
        };
        f.write_str(name)
    }
}

/// An immutable set of [`Capability`] flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u32);

impl Capabilities {
    /// The empty set.
    pub const NONE: Self = Self(0);

    /// Build a set from a slice of flags.
    #[must_use]
    pub const fn from_slice(caps: &[Capability]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < caps.len() {
            bits |= caps[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn contains(self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    /// Whether any of `caps` is present.
    #[must_use]
    pub fn contains_any(self, caps: &[Capability]) -> bool {
        caps.iter().any(|cap| self.contains(*cap))
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the flags in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |cap| self.contains(*cap))
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().fold(0, |bits, cap| bits | cap.bit()))
    }
}

/// Type-level capability rows: device type identifier → finer flags.
///
/// Every built-in catalog entry must have a row here, even an empty one.
pub(crate) const CAPABILITY_ROWS: &[(&str, &[Capability])] = &[
    // HmIP
    ("HmIpTaster", &[Capability::Button]),
    ("HmIpWippe", &[Capability::Button]),
    ("HmIpGriff", &[Capability::Handle]),
    ("HmIpBewegung", &[Capability::Motion]),
    ("HmIpPraezenz", &[Capability::Presence]),
    ("HmIpRoll", &[Capability::Shutter]),
    ("HmIpLampe", &[Capability::Lamp]),
    ("HmIpHeizung", &[Capability::HeaterActuator]),
    ("HmIpTherm", &[Capability::Temperature, Capability::Humidity]),
    ("HmIpTuer", &[Capability::MagnetContact]),
    ("HmIpLichtsensor", &[]),
    // Zigbee
    ("ZigbeeAquaraVibra", &[Capability::Vibration]),
    ("ZigbeeAquaraMotion", &[Capability::Motion]),
    ("ZigbeeAquaraOpple", &[Capability::Button]),
    ("ZigbeeAquaraWater", &[Capability::WaterDetector]),
    ("ZigbeeBlitzShp", &[Capability::Plug]),
    ("ZigbeeIkeaSteckdose", &[Capability::Plug]),
    ("ZigbeeIlluDimmer", &[Capability::DimmableLamp]),
    ("ZigbeeIlluLampe", &[Capability::Lamp]),
    ("ZigbeeIlluLedRGBCCT", &[Capability::Led]),
    ("ZigbeeHeimanSmoke", &[Capability::SmokeDetector]),
    ("ZigbeeSMaBiTMagnetContact", &[Capability::MagnetContact]),
    ("ZigbeeSonoffTemp", &[Capability::Temperature, Capability::Humidity]),
    ("ZigbeeUbisysShutter", &[Capability::Shutter]),
    ("ZigbeeEuroHeater", &[Capability::HeaterActuator]),
    // Class-only types
    ("ShellyShutter", &[]),
    ("Window", &[]),
    ("OwnSonosDevice", &[]),
    ("OwnDaikinDevice", &[]),
    ("WledDevice", &[]),
];

/// Look up the type-level capability row for `device_type`.
pub(crate) fn row_for(device_type: &str) -> Option<Capabilities> {
    CAPABILITY_ROWS
        .iter()
        .find(|(id, _)| *id == device_type)
        .map(|(_, caps)| Capabilities::from_slice(caps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_contain_only_inserted_flags() {
        let caps = Capabilities::from_slice(&[Capability::Temperature, Capability::Humidity]);
        assert!(caps.contains(Capability::Temperature));
        assert!(caps.contains(Capability::Humidity));
        assert!(!caps.contains(Capability::HeaterActuator));
    }

    #[test]
    fn should_iterate_in_declaration_order() {
        let caps: Capabilities = [Capability::Humidity, Capability::Shutter]
            .into_iter()
            .collect();
        let flags: Vec<_> = caps.iter().collect();
        assert_eq!(flags, vec![Capability::Shutter, Capability::Humidity]);
    }

    #[test]
    fn should_be_empty_when_row_has_no_flags() {
        assert!(row_for("HmIpLichtsensor").unwrap().is_empty());
    }

    #[test]
    fn should_return_none_when_type_has_no_row() {
        assert!(row_for("HmIpToaster").is_none());
    }

    #[test]
    fn should_parse_snake_case_names() {
        let cap: Capability = serde_json::from_str("\"magnet_contact\"").unwrap();
        assert_eq!(cap, Capability::MagnetContact);
        assert_eq!(cap.to_string(), "magnet_contact");
    }
}
