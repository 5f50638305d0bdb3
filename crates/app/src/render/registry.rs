//! Aggregate registry module importing every generated room.

use roomgen_domain::room::CompiledRoom;

use super::syntax::{Expr, Import, Item, Module, Stmt};
use super::{GENERATED_HEADER, RenderOptions};

/// Build the registry for `rooms`, keeping their order.
#[must_use]
pub fn render<'a>(
    rooms: impl IntoIterator<Item = &'a CompiledRoom>,
    options: &RenderOptions,
) -> Module {
    let mut imports = vec![Import::Named {
        names: vec!["RoomImportEnforcer".to_string()],
        module: options.runtime_module.clone(),
    }];
    let mut items = Vec::new();

    for room in rooms {
        let class = room.class_name();
        imports.push(Import::Named {
            names: vec![class.clone()],
            module: format!("./{}/{class}", room.slug()),
        });
        items.push(Item::Stmt(Stmt::Expr(
            Expr::path("RoomImportEnforcer", "addRoomConstructor")
                .call(vec![Expr::path(&class, "roomName"), Expr::ident(class)]),
        )));
    }

    Module {
        header: GENERATED_HEADER.iter().map(ToString::to_string).collect(),
        imports,
        items,
    }
}
