//! Group-membership tags.

use std::fmt;

use crate::capability::{Capabilities, Capability};

/// Label grouping devices of one room for group assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupTag {
    /// All devices of one window, by window identifier.
    Window(u32),
    Motion,
    Presence,
    Light,
    Led,
    Plug,
    Speaker,
    AirConditioner,
    Stripe,
    Button,
    /// Heater actuators and temperature/humidity sensors.
    Heating,
    Smoke,
    Water,
}

/// Capability → ambient tag, in emission order.
const AMBIENT_TAGS: &[(&[Capability], GroupTag)] = &[
    (&[Capability::Motion], GroupTag::Motion),
    (&[Capability::Presence], GroupTag::Presence),
    (&[Capability::Lamp, Capability::DimmableLamp], GroupTag::Light),
    (&[Capability::Led], GroupTag::Led),
    (&[Capability::Plug], GroupTag::Plug),
    (&[Capability::Speaker], GroupTag::Speaker),
    (&[Capability::AirConditioner], GroupTag::AirConditioner),
    (&[Capability::LedStrip], GroupTag::Stripe),
    (&[Capability::Button], GroupTag::Button),
    (
        &[
            Capability::HeaterActuator,
            Capability::Temperature,
            Capability::Humidity,
        ],
        GroupTag::Heating,
    ),
    (&[Capability::SmokeDetector], GroupTag::Smoke),
    (&[Capability::WaterDetector], GroupTag::Water),
];

impl GroupTag {
    /// Compute the tags of a device.
    ///
    /// A window identifier wins outright. Without one, a device only gets
    /// capability tags when it opted into ambient grouping.
    #[must_use]
    pub fn for_device(
        capabilities: Capabilities,
        window_id: Option<u32>,
        include_in_group: bool,
    ) -> Vec<Self> {
        if let Some(id) = window_id {
            return vec![Self::Window(id)];
        }
        if !include_in_group {
            return Vec::new();
        }
        AMBIENT_TAGS
            .iter()
            .filter(|(caps, _)| capabilities.contains_any(caps))
            .map(|(_, tag)| *tag)
            .collect()
    }
}

impl fmt::Display for GroupTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window(id) => write!(f, "Window_{id}"),
            Self::Motion => f.write_str("Motion"),
            Self::Presence => f.write_str("Presence"),
            Self::Light => f.write_str("Light"),
            Self::Led => f.write_str("Led"),
            Self::Plug => f.write_str("Plug"),
            Self::Speaker => f.write_str("Speaker"),
            Self::AirConditioner => f.write_str("Ac"),
            Self::Stripe => f.write_str("Stripe"),
            Self::Button => f.write_str("Button"),
            Self::Heating => f.write_str("Heating"),
            Self::Smoke => f.write_str("Smoke"),
            Self::Water => f.write_str("Water"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(flags: &[Capability]) -> Capabilities {
        Capabilities::from_slice(flags)
    }

    #[test]
    fn should_emit_no_tags_when_not_in_group_and_no_window() {
        let tags = GroupTag::for_device(caps(&[Capability::Motion]), None, false);
        assert!(tags.is_empty());
    }

    #[test]
    fn should_emit_single_motion_tag_when_in_group() {
        let tags = GroupTag::for_device(caps(&[Capability::Motion]), None, true);
        assert_eq!(tags, vec![GroupTag::Motion]);
    }

    #[test]
    fn should_prefer_window_tag_over_capabilities() {
        let tags = GroupTag::for_device(caps(&[Capability::Motion]), Some(2), true);
        assert_eq!(tags, vec![GroupTag::Window(2)]);
        assert_eq!(tags[0].to_string(), "Window_2");
    }

    #[test]
    fn should_collapse_climate_readings_into_one_heating_tag() {
        let tags = GroupTag::for_device(
            caps(&[Capability::Temperature, Capability::Humidity]),
            None,
            true,
        );
        assert_eq!(tags, vec![GroupTag::Heating]);
    }

    #[test]
    fn should_ignore_registry_flag_when_tagging() {
        let tags = GroupTag::for_device(
            caps(&[Capability::ManagedRegistry, Capability::Plug]),
            None,
            true,
        );
        assert_eq!(tags, vec![GroupTag::Plug]);
    }
}
