//! Keep a layout host in sync with the registry.

use std::cell::RefCell;
use std::rc::Rc;

use sly_layout::{NodeId, VariableStore, VariableValue};

use crate::config::ColumnsConfig;
use crate::registry::{ColumnRegistry, TemplateSubscription};
use crate::template::ColumnTemplate;

/// Write the current template to `container` now and on every publication
/// until the returned subscription is dropped. Size variables of columns
/// that disappear are removed.
///
/// The store is borrowed mutably inside the callback, so callers must not
/// hold a borrow of it while reporting to or releasing from the registry.
pub fn publish_to<S: VariableStore + 'static>(
    registry: &ColumnRegistry,
    container: NodeId,
    store: Rc<RefCell<S>>,
    config: ColumnsConfig,
) -> TemplateSubscription {
    let current = registry.template();
    current.apply(&mut *store.borrow_mut(), container, &config);
    let applied = RefCell::new(current);
    registry.subscribe(move |template: &ColumnTemplate| {
        let mut store = store.borrow_mut();
        applied
            .borrow()
            .retract_missing(template, &mut *store, container, &config);
        template.apply(&mut *store, container, &config);
        *applied.borrow_mut() = template.clone();
    })
}

/// Point the grid property of a metadata list at the template variable.
pub fn bind_column_grid<S: VariableStore + ?Sized>(
    store: &mut S,
    list: NodeId,
    config: &ColumnsConfig,
) {
    store.set_variable(
        list,
        &config.grid_property,
        VariableValue::Text(format!("var({})", config.template_variable)),
    );
}

#[cfg(test)]
mod tests {
    use sly_layout::{LayoutInspector, MemoryLayout};

    use super::*;
    use crate::probe::ColumnProbe;

    #[test]
    fn host_follows_registry() {
        let registry = ColumnRegistry::new();
        let layout = Rc::new(RefCell::new(MemoryLayout::new()));
        let tree = layout.borrow_mut().add_root(&["sly-file-tree"]);
        let _sync = publish_to(&registry, tree, Rc::clone(&layout), ColumnsConfig::default());

        let size = ColumnProbe::attach(&registry, "size", &80_u32);
        let date = ColumnProbe::attach(&registry, "date", &40_u32);
        assert_eq!(
            layout
                .borrow()
                .variable(tree, "--sly-tree-metadata-columns")
                .map(ToString::to_string),
            Some("minmax(80px, auto) minmax(40px, auto)".to_string())
        );

        drop(size);
        let host = layout.borrow();
        assert_eq!(host.variable(tree, "--sly-tree-cell-size-size"), None);
        assert_eq!(
            host.resolved_variable(tree, "--sly-tree-cell-date-size"),
            Some(sly_core::Length::px(40.0))
        );
        drop(host);
        drop(date);
        assert_eq!(
            layout.borrow().variable(tree, "--sly-tree-metadata-columns"),
            None
        );
    }

    #[test]
    fn grid_binding_references_template() {
        let mut layout = MemoryLayout::new();
        let list = layout.add_root(&["list"]);
        bind_column_grid(&mut layout, list, &ColumnsConfig::default());
        assert_eq!(
            layout.variable(list, "grid-template-columns"),
            Some(&VariableValue::Text(
                "var(--sly-tree-metadata-columns)".to_string()
            ))
        );
    }
}
