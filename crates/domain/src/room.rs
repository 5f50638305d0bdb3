//! Compiled room: devices indexed by type and partitioned into groups.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;
use crate::definition::{DeviceDefinition, RoomDefinition, SettingsOverrides};
use crate::device::CompiledDevice;
use crate::error::{CompileError, ValidationError};
use crate::tag::GroupTag;

/// A room whose devices have been compiled and validated.
///
/// Devices are only ever added; the type and group mappings only grow.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRoom {
    short_name: String,
    long_name: String,
    floor: i32,
    settings: Option<SettingsOverrides>,
    /// Devices in insertion order.
    devices: Vec<CompiledDevice>,
    /// Device type → index → position in `devices`.
    by_type: BTreeMap<String, BTreeMap<u32, usize>>,
    /// Tag → positions in `devices`, in insertion order.
    groups: BTreeMap<GroupTag, Vec<usize>>,
    /// Identifiers of devices that get static members in the generated room.
    identifiers: BTreeSet<String>,
    has_managed_devices: bool,
}

impl CompiledRoom {
    /// Start an empty room from its definition (inline devices are not added).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when the short or long name is
    /// empty, and [`ValidationError::InvalidRoomName`] when the short name
    /// holds anything but letters, digits and underscores.
    pub fn new(def: &RoomDefinition) -> Result<Self, ValidationError> {
        if def.short_name.trim().is_empty() {
            return Err(ValidationError::EmptyName {
                field: "room short name",
            });
        }
        // The short name ends up in a class name and a folder name.
        if !def.short_name.chars().all(|ch| ch.is_alphanumeric() || ch == '_') {
            return Err(ValidationError::InvalidRoomName {
                room: def.short_name.clone(),
            });
        }
        if def.long_name.trim().is_empty() {
            return Err(ValidationError::EmptyName {
                field: "room long name",
            });
        }
        Ok(Self {
            short_name: def.short_name.clone(),
            long_name: def.long_name.clone(),
            floor: def.floor,
            settings: def.settings.clone(),
            devices: Vec::new(),
            by_type: BTreeMap::new(),
            groups: BTreeMap::new(),
            identifiers: BTreeSet::new(),
            has_managed_devices: false,
        })
    }

    /// Insert a compiled device.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownTypeInRoom`] if `catalog` does not
    /// accept the device type, [`ValidationError::DuplicateDevice`] if the
    /// `(type, index)` pair is already taken in this room, or
    /// [`ValidationError::DuplicateIdentifier`] if another device already
    /// renders under the same identifier.
    pub fn add_device(
        &mut self,
        catalog: &Catalog,
        device: CompiledDevice,
    ) -> Result<(), ValidationError> {
        if !catalog.contains(device.device_type()) {
            return Err(ValidationError::UnknownTypeInRoom {
                room: self.short_name.clone(),
                device_type: device.device_type().to_string(),
            });
        }

        let taken = self
            .by_type
            .get(device.device_type())
            .is_some_and(|slots| slots.contains_key(&device.index()));
        if taken {
            return Err(ValidationError::DuplicateDevice {
                room: self.short_name.clone(),
                device_type: device.device_type().to_string(),
                index: device.index(),
            });
        }

        // Window frames render no members of their own.
        let has_members = device.is_bus_addressed() || device.is_singleton();
        if has_members && self.identifiers.contains(device.identifier()) {
            return Err(ValidationError::DuplicateIdentifier {
                room: self.short_name.clone(),
                identifier: device.identifier().to_string(),
                device_type: device.device_type().to_string(),
                index: device.index(),
            });
        }

        let position = self.devices.len();
        self.by_type
            .entry(device.device_type().to_string())
            .or_default()
            .insert(device.index(), position);
        if has_members {
            self.identifiers.insert(device.identifier().to_string());
        }
        self.has_managed_devices |= device.is_managed();
        for tag in device.tags() {
            self.groups.entry(*tag).or_default().push(position);
        }
        self.devices.push(device);
        Ok(())
    }

    /// Compile every device of `defs` into this room, in order.
    ///
    /// # Errors
    ///
    /// Propagates the first compilation or insertion failure.
    pub fn compile_devices<'a>(
        &mut self,
        catalog: &Catalog,
        defs: impl IntoIterator<Item = &'a DeviceDefinition>,
    ) -> Result<(), CompileError> {
        for def in defs {
            let device = CompiledDevice::compile(&self.short_name, def, catalog)?;
            self.add_device(catalog, device)?;
        }
        Ok(())
    }

    /// Room key.
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    #[must_use]
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    #[must_use]
    pub fn floor(&self) -> i32 {
        self.floor
    }

    #[must_use]
    pub fn settings(&self) -> Option<&SettingsOverrides> {
        self.settings.as_ref()
    }

    /// Stable slug derived from floor and short name, e.g. `1_Buero`.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}_{}", self.floor, self.short_name)
    }

    /// Name of the generated room class, e.g. `RoomBuero`.
    #[must_use]
    pub fn class_name(&self) -> String {
        format!("Room{}", self.short_name)
    }

    /// Whether any device must be registered with the managed registry.
    #[must_use]
    pub fn has_managed_devices(&self) -> bool {
        self.has_managed_devices
    }

    /// All devices in insertion order.
    pub fn devices(&self) -> impl Iterator<Item = &CompiledDevice> {
        self.devices.iter()
    }

    /// Devices of one type, ordered by index.
    pub fn devices_of_type(&self, device_type: &str) -> impl Iterator<Item = &CompiledDevice> {
        self.by_type
            .get(device_type)
            .into_iter()
            .flat_map(|slots| slots.values())
            .map(|&position| &self.devices[position])
    }

    /// Device types present, sorted.
    pub fn device_types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }

    /// Devices carrying `tag`, in insertion order.
    pub fn group(&self, tag: GroupTag) -> impl Iterator<Item = &CompiledDevice> {
        self.groups
            .get(&tag)
            .into_iter()
            .flatten()
            .map(|&position| &self.devices[position])
    }

    /// Tags with at least one device, sorted.
    pub fn group_tags(&self) -> impl Iterator<Item = GroupTag> + '_ {
        self.groups.keys().copied()
    }
}
