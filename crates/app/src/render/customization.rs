//! One-time customization stub for a room.

use roomgen_domain::room::CompiledRoom;

use super::customization_class;
use super::syntax::{ClassDecl, Item, Method, Module, Stmt, Visibility};

/// Hook names and the comment placed in each empty body.
const HOOKS: [(&str, &str); 3] = [
    ("preInitialize", "Runs before device settings overrides are applied."),
    ("postInitialize", "Runs after device settings overrides are applied."),
    ("postSuperInitialize", "Runs once the room base is fully initialized."),
];

/// Build the stub module for `room`.
#[must_use]
pub fn render(room: &CompiledRoom) -> Module {
    let methods = HOOKS
        .iter()
        .map(|(name, comment)| Method {
            visibility: Visibility::Public,
            name: (*name).to_string(),
            params: Vec::new(),
            returns: "void".to_string(),
            body: vec![Stmt::Comment((*comment).to_string())],
        })
        .collect();

    Module {
        header: vec![
            format!("Customization hooks for room {}.", room.long_name()),
            "Created once by roomgen and never overwritten afterwards.".to_string(),
        ],
        imports: Vec::new(),
        items: vec![Item::Class(ClassDecl {
            name: customization_class(room),
            extends: None,
            fields: Vec::new(),
            getters: Vec::new(),
            methods,
            constructor: None,
        })],
    }
}
