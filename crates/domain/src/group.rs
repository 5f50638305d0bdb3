//! Group assembly: turns a room's tag buckets into runtime group layouts.
//!
//! Each group kind has its own rule. A kind with no qualifying devices is
//! omitted; the assembler never produces an empty group.

use crate::capability::Capability;
use crate::device::CompiledDevice;
use crate::error::ValidationError;
use crate::room::CompiledRoom;
use crate::tag::GroupTag;

/// The eight supported group kinds, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKind {
    Window,
    Presence,
    Light,
    Buttons,
    Smoke,
    Water,
    Heating,
    Speaker,
}

/// One window: its frame and the devices mounted on it.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowAssembly<'a> {
    pub window_id: u32,
    pub frame: &'a CompiledDevice,
    pub handles: Vec<&'a CompiledDevice>,
    pub vibrations: Vec<&'a CompiledDevice>,
    pub blind_motor: Option<&'a CompiledDevice>,
    pub magnet_contacts: Vec<&'a CompiledDevice>,
    /// Copied from the frame.
    pub no_shutter_on_sunrise: bool,
}

/// Presence sensors and motion sensors, kept apart.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceGroup<'a> {
    pub motion: Vec<&'a CompiledDevice>,
    pub presence: Vec<&'a CompiledDevice>,
}

/// Four positional lists, as the runtime light group expects.
#[derive(Debug, Clone, PartialEq)]
pub struct LightGroup<'a> {
    pub lamps: Vec<&'a CompiledDevice>,
    pub plugs: Vec<&'a CompiledDevice>,
    pub leds: Vec<&'a CompiledDevice>,
    pub stripes: Vec<&'a CompiledDevice>,
}

/// Four positional lists for the heating group.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatingGroup<'a> {
    pub heaters: Vec<&'a CompiledDevice>,
    pub temperature: Vec<&'a CompiledDevice>,
    pub humidity: Vec<&'a CompiledDevice>,
    pub air_conditioners: Vec<&'a CompiledDevice>,
}

/// Every group assembled for one room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomGroups<'a> {
    /// Window assemblies ordered by window id. Their frames form the room's
    /// shutter group.
    pub windows: Vec<WindowAssembly<'a>>,
    pub presence: Option<PresenceGroup<'a>>,
    pub light: Option<LightGroup<'a>>,
    pub buttons: Option<Vec<&'a CompiledDevice>>,
    pub smoke: Option<Vec<&'a CompiledDevice>>,
    pub water: Option<Vec<&'a CompiledDevice>>,
    pub heating: Option<HeatingGroup<'a>>,
    pub speakers: Option<Vec<&'a CompiledDevice>>,
    /// Smoke and water devices that must learn their room's name.
    pub room_name_writebacks: Vec<&'a CompiledDevice>,
}

impl<'a> RoomGroups<'a> {
    /// Assemble all groups of `room`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingWindowFrame`] or
    /// [`ValidationError::AmbiguousWindowFrame`] when a window bucket does not
    /// have exactly one frame, and [`ValidationError::AmbiguousBlindMotor`]
    /// when it has more than one blind motor.
    pub fn assemble(room: &'a CompiledRoom) -> Result<Self, ValidationError> {
        let windows = room
            .group_tags()
            .filter_map(|tag| match tag {
                GroupTag::Window(id) => Some(id),
                _ => None,
            })
            .map(|id| assemble_window(room, id))
            .collect::<Result<Vec<_>, _>>()?;

        let bucket = |tag| room.group(tag).collect::<Vec<_>>();
        let non_empty = |devices: Vec<&'a CompiledDevice>| (!devices.is_empty()).then_some(devices);

        let motion = bucket(GroupTag::Motion);
        let presence_sensors = bucket(GroupTag::Presence);
        let presence = (!motion.is_empty() || !presence_sensors.is_empty()).then(|| PresenceGroup {
            motion,
            presence: presence_sensors,
        });

        let light = LightGroup {
            lamps: bucket(GroupTag::Light),
            plugs: bucket(GroupTag::Plug),
            leds: bucket(GroupTag::Led),
            stripes: bucket(GroupTag::Stripe),
        };
        let light = (!light.lamps.is_empty()
            || !light.plugs.is_empty()
            || !light.leds.is_empty()
            || !light.stripes.is_empty())
        .then_some(light);

        let smoke = non_empty(bucket(GroupTag::Smoke));
        let water = non_empty(bucket(GroupTag::Water));
        let room_name_writebacks = smoke
            .iter()
            .chain(water.iter())
            .flatten()
            .copied()
            .collect();

        Ok(Self {
            windows,
            presence,
            light,
            buttons: non_empty(bucket(GroupTag::Button)),
            smoke,
            water,
            heating: assemble_heating(room),
            speakers: non_empty(bucket(GroupTag::Speaker)),
            room_name_writebacks,
        })
    }

    /// Kinds present in this room, in rendering order.
    #[must_use]
    pub fn kinds(&self) -> Vec<GroupKind> {
        [
            (GroupKind::Window, !self.windows.is_empty()),
            (GroupKind::Presence, self.presence.is_some()),
            (GroupKind::Light, self.light.is_some()),
            (GroupKind::Buttons, self.buttons.is_some()),
            (GroupKind::Smoke, self.smoke.is_some()),
            (GroupKind::Water, self.water.is_some()),
            (GroupKind::Heating, self.heating.is_some()),
            (GroupKind::Speaker, self.speakers.is_some()),
        ]
        .into_iter()
        .filter_map(|(kind, present)| present.then_some(kind))
        .collect()
    }
}

fn assemble_window(
    room: &CompiledRoom,
    window_id: u32,
) -> Result<WindowAssembly<'_>, ValidationError> {
    let members: Vec<_> = room.group(GroupTag::Window(window_id)).collect();
    let with = |cap| {
        members
            .iter()
            .copied()
            .filter(|device| device.has(cap))
            .collect::<Vec<_>>()
    };

    let frames = with(Capability::WindowFrame);
    let frame = match frames.as_slice() {
        [frame] => *frame,
        [] => {
            return Err(ValidationError::MissingWindowFrame {
                room: room.short_name().to_string(),
                window: window_id,
            });
        }
        _ => {
            return Err(ValidationError::AmbiguousWindowFrame {
                room: room.short_name().to_string(),
                window: window_id,
                count: frames.len(),
            });
        }
    };

    let motors = with(Capability::Shutter);
    if motors.len() > 1 {
        return Err(ValidationError::AmbiguousBlindMotor {
            room: room.short_name().to_string(),
            window: window_id,
            count: motors.len(),
        });
    }

    Ok(WindowAssembly {
        window_id,
        frame,
        handles: with(Capability::Handle),
        vibrations: with(Capability::Vibration),
        blind_motor: motors.first().copied(),
        magnet_contacts: with(Capability::MagnetContact),
        no_shutter_on_sunrise: frame.no_shutter_on_sunrise(),
    })
}

/// Built from the heating bucket, or from any air conditioner in the room.
fn assemble_heating(room: &CompiledRoom) -> Option<HeatingGroup<'_>> {
    let heating: Vec<_> = room.group(GroupTag::Heating).collect();
    let air_conditioners: Vec<_> = room
        .devices()
        .filter(|device| device.has(Capability::AirConditioner))
        .collect();
    if heating.is_empty() && air_conditioners.is_empty() {
        return None;
    }
    let with = |cap| {
        heating
            .iter()
            .copied()
            .filter(|device| device.has(cap))
            .collect::<Vec<_>>()
    };
    Some(HeatingGroup {
        heaters: with(Capability::HeaterActuator),
        temperature: with(Capability::Temperature),
        humidity: with(Capability::Humidity),
        air_conditioners,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::definition::{DeviceDefinition, RoomDefinition};

    fn room(devices: Vec<DeviceDefinition>) -> CompiledRoom {
        let mut room = CompiledRoom::new(&RoomDefinition::new("Buero", "Büro", 1)).unwrap();
        room.compile_devices(&Catalog::builtin().unwrap(), &devices).unwrap();
        room
    }

    fn names(devices: &[&CompiledDevice]) -> Vec<String> {
        devices.iter().map(|device| device.name().to_string()).collect()
    }

    #[test]
    fn should_assemble_window_with_all_members() {
        let room = room(vec![
            DeviceDefinition::new("Window", 0).in_window(1),
            DeviceDefinition::new("HmIpGriff", 0).in_window(1),
            DeviceDefinition::new("HmIpGriff", 2).in_window(1),
            DeviceDefinition::new("HmIpRoll", 0).in_window(1),
            DeviceDefinition::new("ZigbeeSMaBiTMagnetContact", 0).in_window(1),
        ]);
        let groups = RoomGroups::assemble(&room).unwrap();

        assert_eq!(groups.windows.len(), 1);
        let window = &groups.windows[0];
        assert_eq!(window.frame.name(), "Fenster");
        assert_eq!(names(&window.handles), vec!["Griff", "Griff_2"]);
        assert_eq!(window.blind_motor.map(CompiledDevice::name), Some("Rollo"));
        assert_eq!(names(&window.magnet_contacts), vec!["Magnetkontakt"]);
        assert!(window.vibrations.is_empty());
        assert_eq!(groups.kinds(), vec![GroupKind::Window]);
    }

    #[test]
    fn should_fail_when_window_has_no_frame() {
        let room = room(vec![DeviceDefinition::new("HmIpGriff", 0).in_window(4)]);
        assert_eq!(
            RoomGroups::assemble(&room).unwrap_err(),
            ValidationError::MissingWindowFrame {
                room: "Buero".to_string(),
                window: 4
            }
        );
    }

    #[test]
    fn should_fail_when_window_has_two_frames() {
        let room = room(vec![
            DeviceDefinition::new("Window", 0).in_window(1),
            DeviceDefinition::new("Window", 2).in_window(1),
        ]);
        assert_eq!(
            RoomGroups::assemble(&room).unwrap_err(),
            ValidationError::AmbiguousWindowFrame {
                room: "Buero".to_string(),
                window: 1,
                count: 2
            }
        );
    }

    #[test]
    fn should_fail_when_window_has_two_blind_motors() {
        let room = room(vec![
            DeviceDefinition::new("Window", 0).in_window(1),
            DeviceDefinition::new("HmIpRoll", 0).in_window(1),
            DeviceDefinition::new("ShellyShutter", 0)
                .in_window(1)
                .named("Rollo Shelly"),
        ]);
        assert!(matches!(
            RoomGroups::assemble(&room),
            Err(ValidationError::AmbiguousBlindMotor { count: 2, .. })
        ));
    }

    #[test]
    fn should_keep_presence_and_motion_lists_apart() {
        let room = room(vec![
            DeviceDefinition::new("HmIpBewegung", 0).in_group(),
            DeviceDefinition::new("HmIpPraezenz", 0).in_group(),
            DeviceDefinition::new("ZigbeeAquaraMotion", 0)
                .in_group()
                .named("Bewegung Tuer"),
        ]);
        let presence = RoomGroups::assemble(&room).unwrap().presence.unwrap();
        assert_eq!(presence.motion.len(), 2);
        assert_eq!(names(&presence.presence), vec!["Praesenz"]);
    }

    #[test]
    fn should_omit_groups_without_qualifying_devices() {
        let room = room(vec![DeviceDefinition::new("HmIpBewegung", 0)]);
        let groups = RoomGroups::assemble(&room).unwrap();
        assert!(groups.kinds().is_empty());
        assert!(groups.presence.is_none());
    }

    #[test]
    fn should_build_light_group_with_four_lists() {
        let room = room(vec![
            DeviceDefinition::new("ZigbeeIlluDimmer", 0).in_group(),
            DeviceDefinition::new("WledDevice", 0).in_group(),
        ]);
        let light = RoomGroups::assemble(&room).unwrap().light.unwrap();
        assert_eq!(names(&light.lamps), vec!["Dimmer"]);
        assert!(light.plugs.is_empty());
        assert!(light.leds.is_empty());
        assert_eq!(names(&light.stripes), vec!["Stripe"]);
    }

    #[test]
    fn should_route_combined_sensor_to_heating_lists_only() {
        let room = room(vec![DeviceDefinition::new("HmIpTherm", 0).in_group()]);
        let groups = RoomGroups::assemble(&room).unwrap();
        let heating = groups.heating.as_ref().unwrap();
        assert_eq!(names(&heating.temperature), vec!["Thermometer"]);
        assert_eq!(names(&heating.humidity), vec!["Thermometer"]);
        assert!(heating.heaters.is_empty());
        assert_eq!(groups.kinds(), vec![GroupKind::Heating]);
    }

    #[test]
    fn should_build_heating_group_for_air_conditioner_alone() {
        let room = room(vec![DeviceDefinition::new("OwnDaikinDevice", 0)]);
        let heating = RoomGroups::assemble(&room).unwrap().heating.unwrap();
        assert_eq!(names(&heating.air_conditioners), vec!["Klima"]);
    }

    #[test]
    fn should_write_back_room_name_to_smoke_and_water_devices() {
        let room = room(vec![
            DeviceDefinition::new("ZigbeeHeimanSmoke", 0).in_group(),
            DeviceDefinition::new("ZigbeeAquaraWater", 0).in_group(),
            DeviceDefinition::new("ZigbeeIkeaSteckdose", 0).in_group(),
        ]);
        let groups = RoomGroups::assemble(&room).unwrap();
        assert_eq!(
            names(&groups.room_name_writebacks),
            vec!["Rauchmelder", "Wassermelder"]
        );
    }
}
