//! Device type catalog: maps a type identifier to its display name and class.
//!
//! The built-in table is read-only data. A house description may add custom
//! types on top of it; additions never replace a built-in entry.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::capability::{self, Capabilities, Capability};
use crate::definition::CustomDeviceType;
use crate::error::CatalogError;

/// The protocol / vendor family a device type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceClass {
    /// Homematic IP sensor/actuator bus.
    HmIp,
    /// Zigbee sensor/actuator bus.
    Zigbee,
    /// Standalone network shutter controllers.
    Shutter,
    /// Virtual window frames.
    Window,
    /// Network speakers.
    Speaker,
    /// Network air conditioners.
    AirConditioner,
    /// Network RGB strips.
    Wled,
}

impl DeviceClass {
    /// Every class, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::HmIp,
        Self::Zigbee,
        Self::Shutter,
        Self::Window,
        Self::Speaker,
        Self::AirConditioner,
        Self::Wled,
    ];

    /// Capabilities implied by membership in this class.
    #[must_use]
    pub const fn implied_capabilities(self) -> Capabilities {
        match self {
            Self::HmIp | Self::Zigbee => Capabilities::from_slice(&[Capability::ManagedRegistry]),
            Self::Shutter => Capabilities::from_slice(&[Capability::Shutter]),
            Self::Window => Capabilities::from_slice(&[Capability::WindowFrame]),
            Self::Speaker => Capabilities::from_slice(&[Capability::Speaker]),
            Self::AirConditioner => Capabilities::from_slice(&[Capability::AirConditioner]),
            Self::Wled => Capabilities::from_slice(&[Capability::LedStrip]),
        }
    }

    /// Self-registering classes are constructed straight into a room slot
    /// instead of being looked up by identifier.
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Speaker | Self::AirConditioner)
    }

    /// Whether devices of this class get an identifier, an accessor and a
    /// mutator in the generated room.
    #[must_use]
    pub const fn is_bus_addressed(self) -> bool {
        !matches!(self, Self::Speaker | Self::AirConditioner | Self::Window)
    }

    /// Stable lowercase name, as accepted in house descriptions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HmIp => "hmip",
            Self::Zigbee => "zigbee",
            Self::Shutter => "shutter",
            Self::Window => "window",
            Self::Speaker => "speaker",
            Self::AirConditioner => "air_conditioner",
            Self::Wled => "wled",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceClass {
    type Err = UnknownDeviceClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or(UnknownDeviceClass)
    }
}

/// Returned when a class name does not match any [`DeviceClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownDeviceClass;

const BUILTIN_TYPES: &[(&str, &str, DeviceClass)] = &[
    ("HmIpTaster", "Taster", DeviceClass::HmIp),
    ("HmIpWippe", "Wippe", DeviceClass::HmIp),
    ("HmIpGriff", "Griff", DeviceClass::HmIp),
    ("HmIpBewegung", "Bewegung", DeviceClass::HmIp),
    ("HmIpPraezenz", "Praesenz", DeviceClass::HmIp),
    ("HmIpRoll", "Rollo", DeviceClass::HmIp),
    ("HmIpLampe", "Lampe", DeviceClass::HmIp),
    ("HmIpHeizung", "Heizung", DeviceClass::HmIp),
    ("HmIpTherm", "Thermometer", DeviceClass::HmIp),
    ("HmIpTuer", "Tuer", DeviceClass::HmIp),
    ("HmIpLichtsensor", "Lichtsensor", DeviceClass::HmIp),
    ("ZigbeeAquaraVibra", "Vibration", DeviceClass::Zigbee),
    ("ZigbeeAquaraMotion", "Bewegung", DeviceClass::Zigbee),
    ("ZigbeeAquaraOpple", "Taster", DeviceClass::Zigbee),
    ("ZigbeeAquaraWater", "Wassermelder", DeviceClass::Zigbee),
    ("ZigbeeBlitzShp", "Steckdose", DeviceClass::Zigbee),
    ("ZigbeeIkeaSteckdose", "Steckdose", DeviceClass::Zigbee),
    ("ZigbeeIlluDimmer", "Dimmer", DeviceClass::Zigbee),
    ("ZigbeeIlluLampe", "Lampe", DeviceClass::Zigbee),
    ("ZigbeeIlluLedRGBCCT", "Led", DeviceClass::Zigbee),
    ("ZigbeeHeimanSmoke", "Rauchmelder", DeviceClass::Zigbee),
    ("ZigbeeSMaBiTMagnetContact", "Magnetkontakt", DeviceClass::Zigbee),
    ("ZigbeeSonoffTemp", "Thermometer", DeviceClass::Zigbee),
    ("ZigbeeUbisysShutter", "Rollo", DeviceClass::Zigbee),
    ("ZigbeeEuroHeater", "Heizung", DeviceClass::Zigbee),
    ("ShellyShutter", "Rollo", DeviceClass::Shutter),
    ("Window", "Fenster", DeviceClass::Window),
    ("OwnSonosDevice", "Sonos", DeviceClass::Speaker),
    ("OwnDaikinDevice", "Klima", DeviceClass::AirConditioner),
    ("WledDevice", "Stripe", DeviceClass::Wled),
];

/// One resolved catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub display_name: String,
    pub class: DeviceClass,
    /// Type-level capabilities, excluding those implied by `class`.
    pub capabilities: Capabilities,
}

/// Lookup table of every device type accepted in a compilation run.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// Build the built-in catalog and check that every type has a
    /// capability row.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingCapabilityRow`] if a built-in type was
    /// added without a matching row.
    pub fn builtin() -> Result<Self, CatalogError> {
        let entries = BUILTIN_TYPES
            .iter()
            .map(|&(id, display_name, class)| -> Result<_, CatalogError> {
                let capabilities =
                    capability::row_for(id).ok_or_else(|| CatalogError::MissingCapabilityRow {
                        device_type: id.to_string(),
                    })?;
                Ok((
                    id.to_string(),
                    CatalogEntry {
                        id: id.to_string(),
                        display_name: display_name.to_string(),
                        class,
                        capabilities,
                    },
                ))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }

    /// Add custom types on top of the current table.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnsupportedDeviceClass`] when a custom type
    /// names an unknown class, or [`CatalogError::DuplicateDeviceType`] when
    /// its identifier is already taken.
    pub fn extend(mut self, custom: &[CustomDeviceType]) -> Result<Self, CatalogError> {
        for def in custom {
            let class = def
                .class
                .parse::<DeviceClass>()
                .map_err(|_| CatalogError::UnsupportedDeviceClass {
                    device_type: def.id.clone(),
                    class: def.class.clone(),
                })?;
            if self.entries.contains_key(&def.id) {
                return Err(CatalogError::DuplicateDeviceType {
                    device_type: def.id.clone(),
                });
            }
            self.entries.insert(
                def.id.clone(),
                CatalogEntry {
                    id: def.id.clone(),
                    display_name: def.display_name.clone(),
                    class,
                    capabilities: def.capabilities.iter().copied().collect(),
                },
            );
        }
        Ok(self)
    }

    /// Resolve a type identifier.
    #[must_use]
    pub fn get(&self, device_type: &str) -> Option<&CatalogEntry> {
        self.entries.get(device_type)
    }

    #[must_use]
    pub fn contains(&self, device_type: &str) -> bool {
        self.entries.contains_key(device_type)
    }

    /// Number of known types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
