//! Common error types for the compilation pipeline.
//!
//! Every failure here is a defect in the house description, never a runtime
//! condition. Each variant carries enough context (room key, device type,
//! index or window id) to locate the offending entry.

/// Top-level compilation error.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The device catalog rejected a type or class.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A room or device definition violates an invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors raised while building or querying the device catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The device type is not part of the catalog.
    #[error("device type `{device_type}` of device `{device}` is not in the catalog")]
    UnknownDeviceType {
        /// The offending type identifier.
        device_type: String,
        /// The device that referenced it (`<room>/<custom name or index>`).
        device: String,
    },

    /// A device class string does not name a supported class.
    #[error("device type `{device_type}` uses unsupported device class `{class}`")]
    UnsupportedDeviceClass {
        /// The type declaring the class.
        device_type: String,
        /// The unsupported class name.
        class: String,
    },

    /// A catalog entry has no capability row.
    #[error("device type `{device_type}` has no capability row")]
    MissingCapabilityRow {
        /// The type without a row.
        device_type: String,
    },

    /// A custom device type reuses an existing identifier.
    #[error("device type `{device_type}` is already defined")]
    DuplicateDeviceType {
        /// The duplicated type identifier.
        device_type: String,
    },
}

/// Invariant violations detected while compiling rooms and groups.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required name is empty.
    #[error("{field} must not be empty")]
    EmptyName {
        /// Which field was empty.
        field: &'static str,
    },

    /// A room short name cannot be used as a class name and folder name.
    #[error("room short name `{room}` may only contain letters, digits and underscores")]
    InvalidRoomName {
        /// The rejected short name.
        room: String,
    },

    /// A device was added to a room with a type the catalog does not accept.
    #[error("room `{room}` declares a device of unknown type `{device_type}`")]
    UnknownTypeInRoom {
        /// Owning room key.
        room: String,
        /// The offending type identifier.
        device_type: String,
    },

    /// Two devices claim the same `(type, index)` pair in one room.
    #[error("room `{room}` already has a `{device_type}` device at index {index}")]
    DuplicateDevice {
        /// Owning room key.
        room: String,
        /// Device type of both claimants.
        device_type: String,
        /// The contested index.
        index: u32,
    },

    /// Two devices in one room resolve to the same generated member name.
    #[error(
        "`{device_type}` device at index {index} in room `{room}` reuses identifier `{identifier}`"
    )]
    DuplicateIdentifier {
        /// Owning room key.
        room: String,
        /// The contested identifier.
        identifier: String,
        /// Type of the rejected device.
        device_type: String,
        /// Index of the rejected device.
        index: u32,
    },

    /// A window bucket has no frame device.
    #[error("window {window} in room `{room}` has no frame device")]
    MissingWindowFrame {
        /// Owning room key.
        room: String,
        /// Window identifier.
        window: u32,
    },

    /// A window bucket has more than one frame device.
    #[error("window {window} in room `{room}` has {count} frame devices, expected exactly one")]
    AmbiguousWindowFrame {
        /// Owning room key.
        room: String,
        /// Window identifier.
        window: u32,
        /// Number of frames found.
        count: usize,
    },

    /// A window bucket has more than one blind motor.
    #[error("window {window} in room `{room}` has {count} blind motors, expected at most one")]
    AmbiguousBlindMotor {
        /// Owning room key.
        room: String,
        /// Window identifier.
        window: u32,
        /// Number of motors found.
        count: usize,
    },

    /// Devices were listed for a room key that no room declares.
    #[error("devices reference room `{room}` which is not declared")]
    UnknownRoom {
        /// The undeclared room key.
        room: String,
    },

    /// Two rooms share the same short name.
    #[error("room `{room}` is declared more than once")]
    DuplicateRoom {
        /// The duplicated room key.
        room: String,
    },

    /// Window frames are virtual and carry no settings object.
    #[error("window frame `{device}` in room `{room}` cannot carry device settings")]
    FrameSettingsUnsupported {
        /// Owning room key.
        room: String,
        /// Resolved name of the frame device.
        device: String,
    },
}
