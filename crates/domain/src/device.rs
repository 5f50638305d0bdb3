//! Compiled device: a definition resolved against the catalog.
//!
//! Compilation is all-or-nothing: either every identifier, flag and tag is
//! derived, or an error names the offending entry.

use crate::capability::{Capabilities, Capability};
use crate::catalog::{Catalog, DeviceClass};
use crate::definition::{DeviceDefinition, SettingsOverrides};
use crate::error::{CatalogError, CompileError, ValidationError};
use crate::tag::GroupTag;

/// A device ready for room insertion and rendering.
///
/// Fields are private: capabilities and names are fixed once compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDevice {
    room: String,
    device_type: String,
    class: DeviceClass,
    index: u32,
    name: String,
    long_name: String,
    identifier: String,
    mutator: String,
    capabilities: Capabilities,
    tags: Vec<GroupTag>,
    address: Option<String>,
    custom_name: Option<String>,
    no_shutter_on_sunrise: bool,
    settings: Option<SettingsOverrides>,
}

impl CompiledDevice {
    /// Compile `def`, owned by room `room`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownDeviceType`] when the type is not in
    /// `catalog`, and [`ValidationError::FrameSettingsUnsupported`] when a
    /// window frame carries settings overrides.
    pub fn compile(
        room: &str,
        def: &DeviceDefinition,
        catalog: &Catalog,
    ) -> Result<Self, CompileError> {
        let entry = catalog.get(&def.device_type).ok_or_else(|| CatalogError::UnknownDeviceType {
            device_type: def.device_type.clone(),
            device: def.locator(room),
        })?;

        let name = short_name(def.custom_name.as_deref(), &entry.display_name, def.index);
        let long_name = format!("{room} {name}").replace('_', " ");
        let identifier = format!("id{name}");
        let mutator = mutator_name(&identifier);
        let capabilities = entry.class.implied_capabilities().union(entry.capabilities);

        if capabilities.contains(Capability::WindowFrame) && def.settings.is_some() {
            return Err(ValidationError::FrameSettingsUnsupported {
                room: room.to_string(),
                device: name,
            }
            .into());
        }

        let tags = GroupTag::for_device(capabilities, def.window_id, def.include_in_group);

        Ok(Self {
            room: room.to_string(),
            device_type: def.device_type.clone(),
            class: entry.class,
            index: def.index,
            name,
            long_name,
            identifier,
            mutator,
            capabilities,
            tags,
            address: def.address.clone(),
            custom_name: def.custom_name.clone(),
            no_shutter_on_sunrise: def.extra.is_some_and(|extra| extra.no_shutter_on_sunrise),
            settings: def.settings.clone(),
        })
    }

    /// Owning room key.
    #[must_use]
    pub fn room(&self) -> &str {
        &self.room
    }

    #[must_use]
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    #[must_use]
    pub fn class(&self) -> DeviceClass {
        self.class
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Resolved short name; also the accessor name in generated code.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<room> <name>` with underscores shown as spaces.
    #[must_use]
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Name of the static identifier slot.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Name of the identifier setter.
    #[must_use]
    pub fn mutator(&self) -> &str {
        &self.mutator
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[must_use]
    pub fn has(&self, cap: Capability) -> bool {
        self.capabilities.contains(cap)
    }

    #[must_use]
    pub fn tags(&self) -> &[GroupTag] {
        &self.tags
    }

    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    #[must_use]
    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    #[must_use]
    pub fn no_shutter_on_sunrise(&self) -> bool {
        self.no_shutter_on_sunrise
    }

    #[must_use]
    pub fn settings(&self) -> Option<&SettingsOverrides> {
        self.settings.as_ref()
    }

    #[must_use]
    pub fn is_managed(&self) -> bool {
        self.has(Capability::ManagedRegistry)
    }

    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.class.is_singleton()
    }

    /// Whether the device gets an identifier slot, accessor and mutator.
    #[must_use]
    pub fn is_bus_addressed(&self) -> bool {
        self.class.is_bus_addressed()
    }
}

/// Custom names have spaces and dots turned into underscores. Catalog names
/// get an `_<index>` suffix only from index 2 on.
fn short_name(custom: Option<&str>, display_name: &str, index: u32) -> String {
    match custom {
        Some(name) => name.replace([' ', '.'], "_"),
        None if index > 1 => format!("{display_name}_{index}"),
        None => display_name.to_string(),
    }
}

fn mutator_name(identifier: &str) -> String {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DeviceExtras;

    fn compile(def: &DeviceDefinition) -> Result<CompiledDevice, CompileError> {
        CompiledDevice::compile("Buero", def, &Catalog::builtin().unwrap())
    }

    #[test]
    fn should_use_display_name_without_suffix_for_index_zero_and_one() {
        let zero = compile(&DeviceDefinition::new("HmIpGriff", 0)).unwrap();
        let one = compile(&DeviceDefinition::new("HmIpGriff", 1)).unwrap();
        assert_eq!(zero.name(), "Griff");
        assert_eq!(one.name(), "Griff");
    }

    #[test]
    fn should_suffix_display_name_when_index_above_one() {
        let device = compile(&DeviceDefinition::new("HmIpGriff", 3)).unwrap();
        assert_eq!(device.name(), "Griff_3");
        assert_eq!(device.long_name(), "Buero Griff 3");
    }

    #[test]
    fn should_normalize_custom_name() {
        let device =
            compile(&DeviceDefinition::new("HmIpTaster", 4).named("Taster Tür.links")).unwrap();
        assert_eq!(device.name(), "Taster_Tür_links");
        assert_eq!(device.long_name(), "Buero Taster Tür links");
    }

    #[test]
    fn should_derive_identifier_and_mutator() {
        let device = compile(&DeviceDefinition::new("HmIpBewegung", 0)).unwrap();
        assert_eq!(device.identifier(), "idBewegung");
        assert_eq!(device.mutator(), "setIdBewegung");
    }

    #[test]
    fn should_fail_with_type_and_device_when_type_is_unknown() {
        let result = compile(&DeviceDefinition::new("HmIpToaster", 0));
        assert!(matches!(
            result,
            Err(CompileError::Catalog(CatalogError::UnknownDeviceType {
                ref device_type,
                ref device,
            })) if device_type == "HmIpToaster" && device == "Buero/HmIpToaster#0"
        ));
    }

    #[test]
    fn should_set_class_and_type_flags() {
        let device = compile(&DeviceDefinition::new("ZigbeeIkeaSteckdose", 0)).unwrap();
        assert!(device.has(Capability::Plug));
        assert!(device.is_managed());
        assert!(!device.has(Capability::Lamp));
    }

    #[test]
    fn should_set_both_climate_flags_for_combined_sensor() {
        let device = compile(&DeviceDefinition::new("HmIpTherm", 0).in_group()).unwrap();
        assert!(device.has(Capability::Temperature));
        assert!(device.has(Capability::Humidity));
        assert!(!device.has(Capability::HeaterActuator));
        assert_eq!(device.tags(), &[GroupTag::Heating]);
    }

    #[test]
    fn should_allow_types_without_finer_flags() {
        let device = compile(&DeviceDefinition::new("HmIpLichtsensor", 0).in_group()).unwrap();
        assert_eq!(
            device.capabilities().iter().collect::<Vec<_>>(),
            vec![Capability::ManagedRegistry]
        );
        assert!(device.tags().is_empty());
    }

    #[test]
    fn should_derive_shutter_from_standalone_class() {
        let device = compile(&DeviceDefinition::new("ShellyShutter", 0)).unwrap();
        assert!(device.has(Capability::Shutter));
        assert!(!device.is_managed());
        assert!(device.is_bus_addressed());
    }

    #[test]
    fn should_carry_sunrise_flag_of_window_frame() {
        let mut def = DeviceDefinition::new("Window", 0).in_window(1);
        def.extra = Some(DeviceExtras {
            no_shutter_on_sunrise: true,
        });
        let device = compile(&def).unwrap();
        assert!(device.has(Capability::WindowFrame));
        assert!(device.no_shutter_on_sunrise());
        assert!(!device.is_bus_addressed());
    }

    #[test]
    fn should_reject_settings_on_window_frame() {
        let mut def = DeviceDefinition::new("Window", 0).in_window(1);
        def.settings = Some(serde_json::Map::new());
        let result = compile(&def);
        assert!(matches!(
            result,
            Err(CompileError::Validation(ValidationError::FrameSettingsUnsupported { .. }))
        ));
    }

    #[test]
    fn should_mark_speaker_as_singleton() {
        let device = compile(&DeviceDefinition::new("OwnSonosDevice", 0)).unwrap();
        assert!(device.is_singleton());
        assert!(device.has(Capability::Speaker));
        assert!(!device.is_managed());
    }
}
