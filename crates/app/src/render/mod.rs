//! Output rendering: compiled rooms to TypeScript artifacts.
//!
//! Each renderer is a pure function from the compiled model to a structured
//! [`syntax::Module`]; [`syntax::Module::to_source`] is the only place text
//! is produced, so identical input always yields identical bytes.

pub mod customization;
pub mod registry;
pub mod room;
pub mod syntax;

use std::path::PathBuf;

use roomgen_domain::catalog::DeviceClass;
use roomgen_domain::room::CompiledRoom;

/// Knobs that shape the emitted code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Module the generated code imports runtime types from.
    pub runtime_module: String,
    /// Registry file name, relative to the output directory.
    pub registry_file: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            runtime_module: "hoffmation-base".to_string(),
            registry_file: "RoomImportEnforcer.generated.ts".to_string(),
        }
    }
}

impl RenderOptions {
    /// Module path for a device class, plus the namespace alias it is
    /// imported under.
    #[must_use]
    pub fn class_module(&self, class: DeviceClass) -> (&'static str, String) {
        let (alias, sub) = match class {
            DeviceClass::HmIp => ("HmIP", "hmIPDevices"),
            DeviceClass::Zigbee => ("Zigbee", "zigbee"),
            DeviceClass::Shutter => ("Shelly", "shelly"),
            DeviceClass::Window => ("Windows", "groups/window"),
            DeviceClass::Speaker => ("Sonos", "sonos"),
            DeviceClass::AirConditioner => ("Daikin", "daikin"),
            DeviceClass::Wled => ("Wled", "wled"),
        };
        (alias, format!("{}/lib/server/devices/{sub}", self.runtime_module))
    }
}

pub(crate) const GENERATED_HEADER: [&str; 2] = [
    "This file is generated by roomgen. Do not edit it by hand:",
    "every run overwrites it. Put custom logic in the customization file.",
];

/// Name of the customization class of `room`.
#[must_use]
pub fn customization_class(room: &CompiledRoom) -> String {
    format!("{}Customization", room.class_name())
}

/// Generated module path, relative to the output directory.
#[must_use]
pub fn room_module_path(room: &CompiledRoom) -> PathBuf {
    PathBuf::from(room.slug()).join(format!("{}.ts", room.class_name()))
}

/// Customization stub path, relative to the output directory.
#[must_use]
pub fn customization_path(room: &CompiledRoom) -> PathBuf {
    PathBuf::from(room.slug()).join(format!("{}.ts", customization_class(room)))
}
