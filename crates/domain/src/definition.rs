//! House description: the static input the compiler consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::capability::Capability;

/// Partial settings overrides, keyed by runtime settings property.
///
/// Keys are kept sorted so every rendering walks them in the same order.
pub type SettingsOverrides = serde_json::Map<String, serde_json::Value>;

/// The whole house: custom types, rooms, and devices listed per room key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseDefinition {
    /// Additional device types, appended to the built-in catalog.
    pub device_types: Vec<CustomDeviceType>,
    /// Rooms in declaration order.
    pub rooms: Vec<RoomDefinition>,
    /// Devices declared outside their room, keyed by room short name.
    ///
    /// They are appended after the room's inline devices.
    pub devices: BTreeMap<String, Vec<DeviceDefinition>>,
}

/// A device type declared by the house description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDeviceType {
    pub id: String,
    pub display_name: String,
    /// Class name, checked against the supported device classes.
    pub class: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

/// One room of the house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDefinition {
    /// Room key; also the base of the generated class name.
    pub short_name: String,
    /// Display name.
    pub long_name: String,
    pub floor: i32,
    #[serde(default)]
    pub devices: Vec<DeviceDefinition>,
    /// Room-level settings overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsOverrides>,
}

/// One device inside a room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceDefinition {
    /// Catalog type identifier.
    #[serde(rename = "type")]
    pub device_type: String,
    /// Index among devices of the same type in this room.
    pub index: u32,
    /// Static network address, if the device has a fixed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    /// Window this device belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<u32>,
    /// Whether the device joins the room's ambient groups.
    #[serde(default)]
    pub include_in_group: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<DeviceExtras>,
    /// Device-level settings overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsOverrides>,
}

/// Type-specific extra parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceExtras {
    /// Window frames only: keep the shutter down at sunrise.
    pub no_shutter_on_sunrise: bool,
}

impl DeviceDefinition {
    /// Shorthand for a definition with only type and index set.
    #[must_use]
    pub fn new(device_type: impl Into<String>, index: u32) -> Self {
        Self {
            device_type: device_type.into(),
            index,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_window(mut self, window_id: u32) -> Self {
        self.window_id = Some(window_id);
        self
    }

    #[must_use]
    pub fn in_group(mut self) -> Self {
        self.include_in_group = true;
        self
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn at(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Locator used in error messages: `<room>/<custom name or type#index>`.
    #[must_use]
    pub fn locator(&self, room: &str) -> String {
        match &self.custom_name {
            Some(name) => format!("{room}/{name}"),
            None => format!("{room}/{}#{}", self.device_type, self.index),
        }
    }
}

impl RoomDefinition {
    #[must_use]
    pub fn new(short_name: impl Into<String>, long_name: impl Into<String>, floor: i32) -> Self {
        Self {
            short_name: short_name.into(),
            long_name: long_name.into(),
            floor,
            devices: Vec::new(),
            settings: None,
        }
    }

    #[must_use]
    pub fn with_device(mut self, device: DeviceDefinition) -> Self {
        self.devices.push(device);
        self
    }
}
