//! Room module renderer.
//!
//! The module is built section by section into a [`RoomSections`] value; the
//! sections are only stitched into a [`Module`] at the very end. Section
//! order follows declaration dependencies: identifiers are declared before
//! any accessor, group or constructor statement refers to them.

use std::collections::BTreeSet;

use roomgen_domain::catalog::DeviceClass;
use roomgen_domain::device::CompiledDevice;
use roomgen_domain::group::{GroupKind, RoomGroups, WindowAssembly};
use roomgen_domain::room::CompiledRoom;

use super::syntax::{ClassDecl, Expr, Field, Getter, Import, Item, Method, Module, Stmt, Visibility};
use super::{GENERATED_HEADER, RenderOptions, customization_class};

const GROUP_MAP: &str = "Map<GroupType, BaseGroup>";

/// Every part of a generated room module, in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSections {
    pub class_name: String,
    pub imports: Vec<Import>,
    pub declarations: Vec<Field>,
    pub accessors: Vec<Getter>,
    pub mutators: Vec<Method>,
    pub initialize: Method,
    pub groups: Method,
    pub constructor: Vec<Stmt>,
    /// Module-level statements after the class.
    pub trailing: Vec<Stmt>,
}

impl RoomSections {
    /// Render `room` and its assembled `groups`.
    #[must_use]
    pub fn build(room: &CompiledRoom, groups: &RoomGroups<'_>, options: &RenderOptions) -> Self {
        let mut ctx = Context {
            room,
            class: room.class_name(),
            customization: customization_class(room),
            runtime: BTreeSet::from([
                "BaseGroup",
                "GroupType",
                "RoomBase",
                "RoomInitializationSettings",
                "RoomService",
                "RoomSettings",
            ]),
        };

        let declarations = ctx.declarations(options);
        let accessors = ctx.accessors(options);
        let mutators = ctx.mutators();
        let initialize = ctx.initialize();
        let groups = ctx.build_groups(groups);
        let constructor = ctx.constructor();
        let trailing = ctx.trailing();
        let imports = ctx.imports(options);

        Self {
            class_name: ctx.class,
            imports,
            declarations,
            accessors,
            mutators,
            initialize,
            groups,
            constructor,
            trailing,
        }
    }

    /// Stitch the sections into one module.
    #[must_use]
    pub fn into_module(self) -> Module {
        let mut methods = self.mutators;
        methods.push(self.initialize);
        methods.push(self.groups);

        let class = ClassDecl {
            name: self.class_name,
            extends: Some("RoomBase".to_string()),
            fields: self.declarations,
            getters: self.accessors,
            methods,
            constructor: Some(self.constructor),
        };

        let mut items = vec![Item::Class(class)];
        items.extend(self.trailing.into_iter().map(Item::Stmt));

        Module {
            header: GENERATED_HEADER.iter().map(ToString::to_string).collect(),
            imports: self.imports,
            items,
        }
    }
}

/// Accumulates the runtime names used while sections are built.
struct Context<'r> {
    room: &'r CompiledRoom,
    class: String,
    customization: String,
    runtime: BTreeSet<&'static str>,
}

impl Context<'_> {
    fn own(&self, property: impl Into<String>) -> Expr {
        Expr::path(&self.class, property)
    }

    fn room_name(&self) -> Expr {
        self.own("roomName")
    }

    fn hook(&self, name: &str) -> Stmt {
        Stmt::Expr(Expr::path(&self.customization, name).call(Vec::new()))
    }

    /// The value passed to group constructors for `device`.
    fn device_ref(&self, device: &CompiledDevice) -> Expr {
        if device.is_singleton() {
            self.own(device.name()).member("id")
        } else {
            self.own(device.identifier())
        }
    }

    fn device_refs(&self, devices: &[&CompiledDevice]) -> Expr {
        Expr::Array(devices.iter().map(|device| self.device_ref(device)).collect())
    }

    fn imports(&self, options: &RenderOptions) -> Vec<Import> {
        let classes: BTreeSet<DeviceClass> =
            self.room.devices().map(CompiledDevice::class).collect();
        let mut imports: Vec<_> = classes
            .into_iter()
            .map(|class| {
                let (alias, module) = options.class_module(class);
                Import::Namespace {
                    alias: alias.to_string(),
                    module,
                }
            })
            .collect();
        imports.push(Import::Named {
            names: self.runtime.iter().map(ToString::to_string).collect(),
            module: options.runtime_module.clone(),
        });
        imports.push(Import::Named {
            names: vec![self.customization.clone()],
            module: format!("./{}", self.customization),
        });
        imports
    }

    fn declarations(&mut self, options: &RenderOptions) -> Vec<Field> {
        let mut fields = vec![
            Field {
                visibility: Visibility::Public,
                name: "roomName".to_string(),
                ty: "string".to_string(),
                init: Some(Expr::str(self.room.short_name())),
            },
            Field {
                visibility: Visibility::Public,
                name: "displayName".to_string(),
                ty: "string".to_string(),
                init: Some(Expr::str(self.room.long_name())),
            },
            Field {
                visibility: Visibility::Public,
                name: "InitialRoomSettings".to_string(),
                ty: "RoomInitializationSettings".to_string(),
                init: Some(Expr::new_of(
                    "RoomInitializationSettings",
                    vec![self.room_name(), Expr::Int(i64::from(self.room.floor()))],
                )),
            },
            Field {
                visibility: Visibility::Public,
                name: "RoomSettings".to_string(),
                ty: "RoomSettings".to_string(),
                init: Some(Expr::new_of(
                    "RoomSettings",
                    vec![self.own("InitialRoomSettings")],
                )),
            },
            Field {
                visibility: Visibility::Public,
                name: "roomObject".to_string(),
                ty: self.class.clone(),
                init: None,
            },
        ];

        for device in self.room.devices() {
            let address = Expr::str(device.address().unwrap_or_default());
            if device.is_singleton() {
                let ty = runtime_type(options, device);
                fields.push(Field {
                    visibility: Visibility::Public,
                    name: device.name().to_string(),
                    init: Some(Expr::new_of(
                        ty.clone(),
                        vec![address, Expr::str(device.long_name()), self.room_name()],
                    )),
                    ty,
                });
            } else if device.is_bus_addressed() {
                fields.push(Field {
                    visibility: Visibility::Private,
                    name: device.identifier().to_string(),
                    ty: "string".to_string(),
                    init: Some(address),
                });
            }
        }
        fields
    }

    fn accessors(&mut self, options: &RenderOptions) -> Vec<Getter> {
        let getters: Vec<_> = self
            .room
            .devices()
            .filter(|device| device.is_bus_addressed())
            .map(|device| {
                let ty = runtime_type(options, device);
                Getter {
                    name: device.name().to_string(),
                    body: Expr::ident("Devices")
                        .member("get")
                        .call(vec![self.own(device.identifier())])
                        .cast(ty.clone()),
                    ty,
                }
            })
            .collect();
        if !getters.is_empty() {
            self.runtime.insert("Devices");
        }
        getters
    }

    fn mutators(&self) -> Vec<Method> {
        self.room
            .devices()
            .filter(|device| device.is_bus_addressed())
            .map(|device| Method {
                visibility: Visibility::Public,
                name: device.mutator().to_string(),
                params: vec![("id".to_string(), "string".to_string())],
                returns: "void".to_string(),
                body: vec![Stmt::Assign(self.own(device.identifier()), Expr::ident("id"))],
            })
            .collect()
    }

    fn initialize(&self) -> Method {
        let mut body = vec![self.hook("preInitialize")];
        for device in self.room.devices() {
            for (key, value) in device.settings().into_iter().flatten() {
                body.push(Stmt::Assign(
                    self.own(device.name()).member("settings").member(key.as_str()),
                    Expr::Json(value.clone()),
                ));
            }
        }
        body.push(self.hook("postInitialize"));
        Method {
            visibility: Visibility::Public,
            name: "initialize".to_string(),
            params: Vec::new(),
            returns: "void".to_string(),
            body,
        }
    }

    fn set_group(&mut self, kind: &str, constructor: &'static str, mut args: Vec<Expr>) -> Stmt {
        self.runtime.insert(constructor);
        args.insert(0, self.room_name());
        Stmt::Expr(Expr::ident("groups").member("set").call(vec![
            Expr::path("GroupType", kind),
            Expr::new_of(constructor, args),
        ]))
    }

    fn window(&self, window: &WindowAssembly<'_>) -> Stmt {
        let motor = window
            .blind_motor
            .map_or_else(|| Expr::ident("undefined"), |motor| self.device_ref(motor));
        Stmt::Const {
            name: window_const(window.window_id),
            ty: "Windows.Window".to_string(),
            value: Expr::new_of(
                "Windows.Window",
                vec![
                    self.room_name(),
                    self.device_refs(&window.handles),
                    self.device_refs(&window.vibrations),
                    motor,
                    self.device_refs(&window.magnet_contacts),
                    Expr::Bool(window.no_shutter_on_sunrise),
                ],
            ),
        }
    }

    fn build_groups(&mut self, groups: &RoomGroups<'_>) -> Method {
        let mut body = vec![Stmt::Const {
            name: "groups".to_string(),
            ty: GROUP_MAP.to_string(),
            value: Expr::new_of(GROUP_MAP, Vec::new()),
        }];

        for kind in groups.kinds() {
            match kind {
                GroupKind::Window => {
                    body.extend(groups.windows.iter().map(|window| self.window(window)));
                    let windows = groups
                        .windows
                        .iter()
                        .map(|window| Expr::ident(window_const(window.window_id)))
                        .collect();
                    body.push(self.set_group("Window", "WindowGroup", vec![Expr::Array(windows)]));
                }
                GroupKind::Presence => {
                    if let Some(presence) = &groups.presence {
                        let args = vec![
                            self.device_refs(&presence.motion),
                            self.device_refs(&presence.presence),
                        ];
                        body.push(self.set_group("Presence", "PresenceGroup", args));
                    }
                }
                GroupKind::Light => {
                    if let Some(light) = &groups.light {
                        let args = vec![
                            self.device_refs(&light.lamps),
                            self.device_refs(&light.plugs),
                            self.device_refs(&light.leds),
                            self.device_refs(&light.stripes),
                        ];
                        body.push(self.set_group("Light", "LightGroup", args));
                    }
                }
                GroupKind::Buttons => {
                    if let Some(buttons) = &groups.buttons {
                        let args = vec![self.device_refs(buttons)];
                        body.push(self.set_group("Taster", "TasterGroup", args));
                    }
                }
                GroupKind::Smoke => {
                    if let Some(smoke) = &groups.smoke {
                        let args = vec![self.device_refs(smoke)];
                        body.push(self.set_group("Smoke", "SmokeGroup", args));
                    }
                }
                GroupKind::Water => {
                    if let Some(water) = &groups.water {
                        let args = vec![self.device_refs(water)];
                        body.push(self.set_group("Water", "WaterGroup", args));
                    }
                }
                GroupKind::Heating => {
                    if let Some(heating) = &groups.heating {
                        let args = vec![
                            self.device_refs(&heating.heaters),
                            self.device_refs(&heating.temperature),
                            self.device_refs(&heating.humidity),
                            self.device_refs(&heating.air_conditioners),
                        ];
                        body.push(self.set_group("Heating", "HeatGroup", args));
                    }
                }
                GroupKind::Speaker => {
                    if let Some(speakers) = &groups.speakers {
                        let args = vec![self.device_refs(speakers)];
                        body.push(self.set_group("Speaker", "SpeakerGroup", args));
                    }
                }
            }
        }

        for device in &groups.room_name_writebacks {
            body.push(Stmt::Assign(
                self.own(device.name()).member("roomName"),
                self.own("displayName"),
            ));
        }

        body.push(Stmt::Return(Expr::ident("groups")));
        Method {
            visibility: Visibility::Private,
            name: "buildGroups".to_string(),
            params: Vec::new(),
            returns: GROUP_MAP.to_string(),
            body,
        }
    }

    fn constructor(&self) -> Vec<Stmt> {
        let mut body: Vec<_> = self
            .room
            .settings()
            .into_iter()
            .flatten()
            .map(|(key, value)| {
                Stmt::Assign(
                    self.own("RoomSettings").member(key.as_str()),
                    Expr::Json(value.clone()),
                )
            })
            .collect();

        body.push(Stmt::Const {
            name: "groups".to_string(),
            ty: GROUP_MAP.to_string(),
            value: self.own("buildGroups").call(Vec::new()),
        });
        body.push(Stmt::Super(vec![
            self.own("InitialRoomSettings"),
            self.own("RoomSettings"),
            Expr::ident("groups"),
        ]));
        body.push(Stmt::Assign(self.own("roomObject"), Expr::This));
        for device in self.room.devices().filter(|device| device.is_managed()) {
            body.push(Stmt::Expr(
                Expr::This
                    .member("deviceCluster")
                    .member("addByDeviceType")
                    .call(vec![self.own(device.name())]),
            ));
        }
        body.push(Stmt::Expr(self.own("initialize").call(Vec::new())));
        body.push(Stmt::Expr(Expr::This.member("initializeBase").call(Vec::new())));
        body.push(self.hook("postSuperInitialize"));
        body.push(Stmt::Expr(Expr::This.member("persist").call(Vec::new())));
        body
    }

    fn trailing(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        if self.room.has_managed_devices() {
            self.runtime.insert("DeviceType");
            self.runtime.insert("RoomDeviceAddingSettings");
            statements.push(Stmt::Const {
                name: "deviceAddingSettings".to_string(),
                ty: "RoomDeviceAddingSettings".to_string(),
                value: Expr::new_of("RoomDeviceAddingSettings", vec![self.room_name()]),
            });
            for device in self
                .room
                .devices()
                .filter(|device| device.is_managed() && device.is_bus_addressed())
            {
                let mut args = vec![
                    Expr::path("DeviceType", device.device_type()),
                    self.own(device.mutator()),
                    Expr::Int(i64::from(device.index())),
                ];
                if let Some(custom) = device.custom_name() {
                    args.push(Expr::str(custom));
                }
                statements.push(Stmt::Expr(
                    Expr::ident("deviceAddingSettings").member("addDevice").call(args),
                ));
            }
            statements.push(Stmt::Assign(
                self.own("InitialRoomSettings").member("deviceAddingSettings"),
                Expr::ident("deviceAddingSettings"),
            ));
        }
        statements.push(Stmt::Expr(
            Expr::path("RoomService", "addInitialRoomSettings")
                .call(vec![self.own("InitialRoomSettings")]),
        ));
        statements
    }
}

fn runtime_type(options: &RenderOptions, device: &CompiledDevice) -> String {
    let (alias, _) = options.class_module(device.class());
    format!("{alias}.{}", device.device_type())
}

fn window_const(window_id: u32) -> String {
    format!("window{window_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomgen_domain::catalog::Catalog;
    use roomgen_domain::definition::{DeviceDefinition, RoomDefinition};

    fn compile(def: RoomDefinition) -> CompiledRoom {
        let mut room = CompiledRoom::new(&def).unwrap();
        room.compile_devices(&Catalog::builtin().unwrap(), &def.devices)
            .unwrap();
        room
    }

    fn sections(room: &CompiledRoom) -> RoomSections {
        let groups = RoomGroups::assemble(room).unwrap();
        RoomSections::build(room, &groups, &RenderOptions::default())
    }

    fn buero() -> CompiledRoom {
        compile(
            RoomDefinition::new("Buero", "Büro", 1)
                .with_device(DeviceDefinition::new("Window", 0).in_window(1))
                .with_device(DeviceDefinition::new("HmIpGriff", 0).in_window(1))
                .with_device(DeviceDefinition::new("HmIpBewegung", 0).in_group())
                .with_device(DeviceDefinition::new("ZigbeeIkeaSteckdose", 0).in_group()),
        )
    }

    #[test]
    fn should_render_buero_example() {
        let source = sections(&buero()).into_module().to_source();

        assert_eq!(source.matches("new Windows.Window(").count(), 1);
        assert!(source.contains(
            "    const window1: Windows.Window = new Windows.Window(RoomBuero.roomName, [RoomBuero.idGriff], [], undefined, [], false);\n"
        ));
        assert!(source.contains(
            "    groups.set(GroupType.Presence, new PresenceGroup(RoomBuero.roomName, [RoomBuero.idBewegung], []));\n"
        ));
        assert_eq!(source.matches("new LightGroup(").count(), 1);
        assert!(source.contains(
            "new LightGroup(RoomBuero.roomName, [], [RoomBuero.idSteckdose], [], [])"
        ));
        assert!(source.contains(
            "const deviceAddingSettings: RoomDeviceAddingSettings = new RoomDeviceAddingSettings(RoomBuero.roomName);\n"
        ));
        assert!(source.contains(
            "deviceAddingSettings.addDevice(DeviceType.HmIpBewegung, RoomBuero.setIdBewegung, 0);\n"
        ));
        assert!(
            source.ends_with("RoomService.addInitialRoomSettings(RoomBuero.InitialRoomSettings);\n")
        );
    }

    #[test]
    fn should_render_identically_twice() {
        let room = buero();
        let first = sections(&room).into_module().to_source();
        let second = sections(&room).into_module().to_source();
        assert_eq!(first, second);
    }

    #[test]
    fn should_import_each_device_class_once_in_class_order() {
        let imports = sections(&buero()).imports;
        let aliases: Vec<_> = imports
            .iter()
            .filter_map(|import| match import {
                Import::Namespace { alias, .. } => Some(alias.as_str()),
                Import::Named { .. } => None,
            })
            .collect();
        assert_eq!(aliases, vec!["HmIP", "Zigbee", "Windows"]);
        assert_eq!(
            imports.last(),
            Some(&Import::Named {
                names: vec!["RoomBueroCustomization".to_string()],
                module: "./RoomBueroCustomization".to_string(),
            })
        );
    }

    #[test]
    fn should_skip_accessors_and_mutators_for_singletons() {
        let room = compile(
            RoomDefinition::new("Wohnzimmer", "Wohnzimmer", 0)
                .with_device(DeviceDefinition::new("OwnSonosDevice", 0).in_group())
                .with_device(DeviceDefinition::new("OwnDaikinDevice", 0).at("192.168.1.20")),
        );
        let sections = sections(&room);

        assert!(sections.accessors.is_empty());
        assert!(sections.mutators.is_empty());
        let slots: Vec<_> = sections
            .declarations
            .iter()
            .map(|field| field.name.as_str())
            .skip(5)
            .collect();
        assert_eq!(slots, vec!["Sonos", "Klima"]);

        let source = sections.into_module().to_source();
        assert!(source.contains(
            "public static Klima: Daikin.OwnDaikinDevice = new Daikin.OwnDaikinDevice('192.168.1.20', 'Wohnzimmer Klima', RoomWohnzimmer.roomName);"
        ));
        assert!(
            source.contains("new SpeakerGroup(RoomWohnzimmer.roomName, [RoomWohnzimmer.Sonos.id])")
        );
        assert!(source.contains(
            "new HeatGroup(RoomWohnzimmer.roomName, [], [], [], [RoomWohnzimmer.Klima.id])"
        ));
        assert!(!source.contains("deviceAddingSettings"));
        assert!(!source.contains("Devices"));
    }

    #[test]
    fn should_apply_device_overrides_between_hooks() {
        let mut settings = serde_json::Map::new();
        settings.insert("useInAutomation".to_string(), serde_json::Value::Bool(false));
        let mut device = DeviceDefinition::new("ZigbeeIkeaSteckdose", 0);
        device.settings = Some(settings);
        let room = compile(RoomDefinition::new("Buero", "Büro", 1).with_device(device));

        let body = sections(&room).initialize.body;
        assert_eq!(body.len(), 3);
        assert_eq!(
            body[0],
            Stmt::Expr(Expr::path("RoomBueroCustomization", "preInitialize").call(Vec::new()))
        );
        assert_eq!(
            body[1],
            Stmt::Assign(
                Expr::path("RoomBuero", "Steckdose")
                    .member("settings")
                    .member("useInAutomation"),
                Expr::Json(serde_json::Value::Bool(false)),
            )
        );
        assert_eq!(
            body[2],
            Stmt::Expr(Expr::path("RoomBueroCustomization", "postInitialize").call(Vec::new()))
        );
    }

    #[test]
    fn should_order_constructor_sequence() {
        let mut def = RoomDefinition::new("Buero", "Büro", 1)
            .with_device(DeviceDefinition::new("HmIpTaster", 0).in_group());
        let mut settings = serde_json::Map::new();
        settings.insert("ambientLightAfterSunset".to_string(), serde_json::Value::Bool(true));
        def.settings = Some(settings);
        let source = sections(&compile(def)).into_module().to_source();

        let expected = "\
  public constructor() {
    RoomBuero.RoomSettings.ambientLightAfterSunset = true;
    const groups: Map<GroupType, BaseGroup> = RoomBuero.buildGroups();
    super(RoomBuero.InitialRoomSettings, RoomBuero.RoomSettings, groups);
    RoomBuero.roomObject = this;
    this.deviceCluster.addByDeviceType(RoomBuero.Taster);
    RoomBuero.initialize();
    this.initializeBase();
    RoomBueroCustomization.postSuperInitialize();
    this.persist();
  }
";
        assert!(source.contains(expected));
    }

    #[test]
    fn should_pass_custom_name_to_device_adding_settings() {
        let room = compile(
            RoomDefinition::new("Buero", "Büro", 1)
                .with_device(DeviceDefinition::new("HmIpTaster", 2).named("Taster Tür")),
        );
        let source = sections(&room).into_module().to_source();
        assert!(source.contains(
            "deviceAddingSettings.addDevice(DeviceType.HmIpTaster, RoomBuero.setIdTaster_Tür, 2, 'Taster Tür');"
        ));
        assert!(source.contains("public static get Taster_Tür(): HmIP.HmIpTaster {"));
    }

    #[test]
    fn should_write_room_name_back_to_smoke_detectors() {
        let room = compile(
            RoomDefinition::new("Flur", "Flur", 0)
                .with_device(DeviceDefinition::new("ZigbeeHeimanSmoke", 0).in_group()),
        );
        let source = sections(&room).into_module().to_source();
        assert!(source.contains("new SmokeGroup(RoomFlur.roomName, [RoomFlur.idRauchmelder])"));
        assert!(source.contains("    RoomFlur.Rauchmelder.roomName = RoomFlur.displayName;\n"));
    }
}
