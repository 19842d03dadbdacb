// SPDX-License-Identifier: AGPL-3.0-or-later

//! Role permission aggregation.
//!
//! Turns a flat `(role, module, code)` tuple stream into the per-role view
//! served by the role listing: for each role, permissions partitioned by
//! module in first-seen module order, with operation names de-duplicated in
//! first-seen order. Pure functions; identical input produces identical
//! output.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Injectable permission-code to operation-name translation table.
///
/// Unmapped codes pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct OperationMap {
    entries: HashMap<String, String>,
}

impl OperationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table for the seeded modules: `add_*` → create,
    /// `view_*` → view, `change_*` → update, `delete_*` → delete.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        for module in ["snippet", "user"] {
            map.insert(format!("add_{module}"), "create");
            map.insert(format!("view_{module}"), "view");
            map.insert(format!("change_{module}"), "update");
            map.insert(format!("delete_{module}"), "delete");
        }
        map
    }

    pub fn insert(&mut self, code: impl Into<String>, operation: impl Into<String>) {
        self.entries.insert(code.into(), operation.into());
    }

    /// Translate a raw permission code to its display operation name.
    pub fn translate(&self, code: &str) -> String {
        self.entries
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}

/// Operations grouped under one module of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ModulePermissions {
    pub module_name: String,
    pub operations: Vec<String>,
}

/// One role with its per-module permission view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RoleView {
    pub name: String,
    pub permissions: Vec<ModulePermissions>,
}

/// Aggregate `(role, module, code)` tuples into role views.
///
/// Roles and modules keep first-seen order; operation names are
/// de-duplicated preserving first occurrence.
pub fn aggregate_role_permissions(
    tuples: &[(String, String, String)],
    operations: &OperationMap,
) -> Vec<RoleView> {
    let mut roles: Vec<RoleView> = Vec::new();

    for (role, module, code) in tuples {
        let role_view = match roles.iter_mut().find(|r| &r.name == role) {
            Some(existing) => existing,
            None => {
                roles.push(RoleView {
                    name: role.clone(),
                    permissions: Vec::new(),
                });
                roles.last_mut().expect("just pushed")
            }
        };

        let module_view = match role_view
            .permissions
            .iter_mut()
            .find(|m| &m.module_name == module)
        {
            Some(existing) => existing,
            None => {
                role_view.permissions.push(ModulePermissions {
                    module_name: module.clone(),
                    operations: Vec::new(),
                });
                role_view.permissions.last_mut().expect("just pushed")
            }
        };

        let operation = operations.translate(code);
        if !module_view.operations.contains(&operation) {
            module_view.operations.push(operation);
        }
    }

    roles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuples(raw: &[(&str, &str, &str)]) -> Vec<(String, String, String)> {
        raw.iter()
            .map(|(r, m, c)| (r.to_string(), m.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn duplicates_removed_and_module_order_is_first_seen() {
        let input = tuples(&[
            ("R", "mod_a", "x"),
            ("R", "mod_b", "y"),
            ("R", "mod_a", "x"),
        ]);

        let views = aggregate_role_permissions(&input, &OperationMap::new());
        assert_eq!(
            views,
            vec![RoleView {
                name: "R".to_string(),
                permissions: vec![
                    ModulePermissions {
                        module_name: "mod_a".to_string(),
                        operations: vec!["x".to_string()],
                    },
                    ModulePermissions {
                        module_name: "mod_b".to_string(),
                        operations: vec!["y".to_string()],
                    },
                ],
            }]
        );
    }

    #[test]
    fn codes_translate_through_the_map_and_unmapped_pass_through() {
        let input = tuples(&[
            ("Admin", "snippets", "add_snippet"),
            ("Admin", "snippets", "view_snippet"),
            ("Admin", "snippets", "run_snippet"),
        ]);

        let views = aggregate_role_permissions(&input, &OperationMap::with_defaults());
        assert_eq!(
            views[0].permissions[0].operations,
            vec!["create", "view", "run_snippet"]
        );
    }

    #[test]
    fn operation_dedup_preserves_first_seen_order() {
        // Two codes mapping to the same display name de-duplicate too.
        let mut map = OperationMap::new();
        map.insert("add_snippet", "create");
        map.insert("insert_snippet", "create");

        let input = tuples(&[
            ("R", "snippets", "add_snippet"),
            ("R", "snippets", "insert_snippet"),
            ("R", "snippets", "view_snippet"),
        ]);

        let views = aggregate_role_permissions(&input, &map);
        assert_eq!(
            views[0].permissions[0].operations,
            vec!["create", "view_snippet"]
        );
    }

    #[test]
    fn roles_keep_first_seen_order() {
        let input = tuples(&[
            ("B", "m", "x"),
            ("A", "m", "x"),
            ("B", "n", "y"),
        ]);

        let views = aggregate_role_permissions(&input, &OperationMap::new());
        let names: Vec<_> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(views[0].permissions.len(), 2);
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let input = tuples(&[
            ("R", "mod_a", "x"),
            ("R", "mod_b", "y"),
            ("R", "mod_a", "z"),
        ]);
        let map = OperationMap::with_defaults();

        let first = aggregate_role_permissions(&input, &map);
        let second = aggregate_role_permissions(&input, &map);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_no_roles() {
        let views = aggregate_role_permissions(&[], &OperationMap::new());
        assert!(views.is_empty());
    }
}
