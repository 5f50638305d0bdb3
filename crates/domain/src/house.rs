//! House compilation: every room of a house description, in input order.

use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::definition::HouseDefinition;
use crate::error::{CompileError, ValidationError};
use crate::room::CompiledRoom;

/// The compiled model of a whole house.
#[derive(Debug, Clone)]
pub struct CompiledHouse {
    pub catalog: Catalog,
    /// Rooms in declaration order.
    pub rooms: Vec<CompiledRoom>,
}

impl CompiledHouse {
    /// Compile `house` against the built-in catalog plus its custom types.
    ///
    /// # Errors
    ///
    /// Returns the first catalog or validation failure. No partial house is
    /// ever returned.
    pub fn compile(house: &HouseDefinition) -> Result<Self, CompileError> {
        let catalog = Catalog::builtin()?.extend(&house.device_types)?;

        let mut declared = BTreeSet::new();
        for room in &house.rooms {
            if !declared.insert(room.short_name.as_str()) {
                return Err(ValidationError::DuplicateRoom {
                    room: room.short_name.clone(),
                }
                .into());
            }
        }
        if let Some(room) = house
            .devices
            .keys()
            .find(|key| !declared.contains(key.as_str()))
        {
            return Err(ValidationError::UnknownRoom { room: room.clone() }.into());
        }

        let rooms = house
            .rooms
            .iter()
            .map(|def| -> Result<CompiledRoom, CompileError> {
                let mut room = CompiledRoom::new(def)?;
                let detached = house.devices.get(&def.short_name).into_iter().flatten();
                room.compile_devices(&catalog, def.devices.iter().chain(detached))?;
                Ok(room)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { catalog, rooms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::definition::{CustomDeviceType, DeviceDefinition, RoomDefinition};
    use crate::error::CatalogError;
    use crate::tag::GroupTag;

    fn house(rooms: Vec<RoomDefinition>) -> HouseDefinition {
        HouseDefinition {
            rooms,
            ..HouseDefinition::default()
        }
    }

    #[test]
    fn should_keep_room_declaration_order() {
        let compiled = CompiledHouse::compile(&house(vec![
            RoomDefinition::new("Wohnzimmer", "Wohnzimmer", 0),
            RoomDefinition::new("Buero", "Büro", 1),
        ]))
        .unwrap();
        let keys: Vec<_> = compiled.rooms.iter().map(CompiledRoom::short_name).collect();
        assert_eq!(keys, vec!["Wohnzimmer", "Buero"]);
    }

    #[test]
    fn should_append_detached_devices_to_their_room() {
        let mut def = house(vec![
            RoomDefinition::new("Buero", "Büro", 1)
                .with_device(DeviceDefinition::new("HmIpGriff", 0)),
        ]);
        def.devices.insert("Buero".to_string(), vec![DeviceDefinition::new("HmIpTaster", 0)]);
        let compiled = CompiledHouse::compile(&def).unwrap();
        let types: Vec<_> = compiled.rooms[0]
            .devices()
            .map(|device| device.device_type().to_string())
            .collect();
        assert_eq!(types, vec!["HmIpGriff", "HmIpTaster"]);
    }

    #[test]
    fn should_fail_when_devices_reference_undeclared_room() {
        let mut def = house(vec![RoomDefinition::new("Buero", "Büro", 1)]);
        def.devices.insert("Keller".to_string(), vec![DeviceDefinition::new("HmIpTaster", 0)]);
        assert!(matches!(
            CompiledHouse::compile(&def),
            Err(CompileError::Validation(ValidationError::UnknownRoom { ref room }))
                if room == "Keller"
        ));
    }

    #[test]
    fn should_fail_when_room_is_declared_twice() {
        let def = house(vec![
            RoomDefinition::new("Buero", "Büro", 1),
            RoomDefinition::new("Buero", "Büro 2", 2),
        ]);
        assert!(matches!(
            CompiledHouse::compile(&def),
            Err(CompileError::Validation(ValidationError::DuplicateRoom { .. }))
        ));
    }

    #[test]
    fn should_fail_when_custom_type_has_unsupported_class() {
        let mut def = house(vec![RoomDefinition::new("Buero", "Büro", 1)]);
        def.device_types.push(CustomDeviceType {
            id: "KnxDimmer".to_string(),
            display_name: "Dimmer".to_string(),
            class: "knx".to_string(),
            capabilities: Vec::new(),
        });
        assert!(matches!(
            CompiledHouse::compile(&def),
            Err(CompileError::Catalog(CatalogError::UnsupportedDeviceClass { .. }))
        ));
    }

    #[test]
    fn should_compile_devices_of_custom_types() {
        let mut def = house(vec![
            RoomDefinition::new("Buero", "Büro", 1)
                .with_device(DeviceDefinition::new("ZigbeeTuyaMotion", 0).in_group()),
        ]);
        def.device_types.push(CustomDeviceType {
            id: "ZigbeeTuyaMotion".to_string(),
            display_name: "Bewegung".to_string(),
            class: "zigbee".to_string(),
            capabilities: vec![Capability::Motion],
        });
        let compiled = CompiledHouse::compile(&def).unwrap();
        let room = &compiled.rooms[0];
        assert!(room.has_managed_devices());
        assert_eq!(room.group(GroupTag::Motion).count(), 1);
    }
}
