// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-memory credential and snippet store.
//!
//! The store stands in for the relational credential store behind named
//! repository methods. All mutations are single update-by-key operations;
//! callers hold the `AppState` lock for the duration of one call, so
//! concurrent requests for different keys never contend on application
//! logic.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    CreateSnippetRequest, Permission, RoleGroup, Snippet, UpdateSnippetRequest, User,
};

#[derive(Default)]
pub struct Store {
    users: HashMap<String, User>,
    roles: Vec<RoleGroup>,
    snippets: HashMap<Uuid, Snippet>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Look up an active user, the common liveness query.
    pub fn find_active(&self, username: &str) -> Option<&User> {
        self.users.get(username).filter(|u| u.is_active)
    }

    /// Idempotent create-or-update. An existing user gets its role set
    /// replaced with the single given role; a new user is created with it.
    /// The role group must exist.
    pub fn create_or_update_user(
        &mut self,
        phone_number: &str,
        role: &str,
        password_hash: Option<String>,
    ) -> Result<(), ApiError> {
        if !self.role_exists(role) {
            return Err(ApiError::value_error(format!("Unknown role '{role}'")));
        }

        match self.users.get_mut(phone_number) {
            Some(user) => {
                user.roles = vec![role.to_string()];
            }
            None => {
                let mut user = User::new(phone_number);
                user.password_hash = password_hash;
                user.roles = vec![role.to_string()];
                self.users.insert(phone_number.to_string(), user);
            }
        }
        Ok(())
    }

    /// Insert a fully constructed user record, keyed by its username.
    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.username.clone(), user);
    }

    /// Insert a service account (password-grant eligible). Used for seeding.
    pub fn insert_service_user(&mut self, username: &str, password_hash: String, roles: Vec<String>) {
        let mut user = User::new(username);
        user.password_hash = Some(password_hash);
        user.is_service_user = true;
        user.roles = roles;
        self.users.insert(username.to_string(), user);
    }

    /// Toggle `is_active`. Touches no other field.
    pub fn set_active(&mut self, username: &str, active: bool) -> Result<(), ApiError> {
        match self.users.get_mut(username) {
            Some(user) => {
                user.is_active = active;
                Ok(())
            }
            None => Err(ApiError::not_found("User not found")),
        }
    }

    /// Record a successful federated login.
    pub fn touch_last_login(&mut self, username: &str) {
        if let Some(user) = self.users.get_mut(username) {
            user.last_login = Some(Utc::now());
        }
    }

    // =========================================================================
    // Roles
    // =========================================================================

    pub fn role_exists(&self, name: &str) -> bool {
        self.roles.iter().any(|g| g.name == name)
    }

    pub fn insert_role(&mut self, name: impl Into<String>, permissions: Vec<Permission>) {
        self.roles.push(RoleGroup {
            name: name.into(),
            permissions,
        });
    }

    /// Seed the built-in role groups with their module permissions.
    pub fn seed_roles(&mut self) {
        self.insert_role(
            "Admin",
            vec![
                Permission::new("snippets", "add_snippet"),
                Permission::new("snippets", "view_snippet"),
                Permission::new("snippets", "change_snippet"),
                Permission::new("snippets", "delete_snippet"),
                Permission::new("users", "add_user"),
                Permission::new("users", "view_user"),
                Permission::new("users", "change_user"),
            ],
        );
        self.insert_role(
            "Staff",
            vec![
                Permission::new("snippets", "add_snippet"),
                Permission::new("snippets", "view_snippet"),
                Permission::new("snippets", "change_snippet"),
                Permission::new("users", "view_user"),
            ],
        );
        self.insert_role(
            "Reader",
            vec![Permission::new("snippets", "view_snippet")],
        );
    }

    /// Flatten role groups into `(role, module, code)` tuples, preserving
    /// role insertion order and per-role permission order.
    pub fn role_permission_tuples(&self) -> Vec<(String, String, String)> {
        self.roles
            .iter()
            .flat_map(|group| {
                group.permissions.iter().map(|p| {
                    (group.name.clone(), p.module.clone(), p.code.clone())
                })
            })
            .collect()
    }

    /// Whether any of the given roles grants `(module, code)`.
    pub fn roles_grant(&self, roles: &[String], module: &str, code: &str) -> bool {
        self.roles
            .iter()
            .filter(|group| roles.contains(&group.name))
            .any(|group| {
                group
                    .permissions
                    .iter()
                    .any(|p| p.module == module && p.code == code)
            })
    }

    // =========================================================================
    // Snippets
    // =========================================================================

    /// Live snippets ordered by creation time.
    pub fn list_live_snippets(&self) -> Vec<Snippet> {
        let mut snippets: Vec<Snippet> = self
            .snippets
            .values()
            .filter(|s| s.status)
            .cloned()
            .collect();
        snippets.sort_by_key(|s| s.created);
        snippets
    }

    pub fn find_snippet(&self, id: &Uuid) -> Option<&Snippet> {
        self.snippets.get(id)
    }

    /// Like [`find_snippet`](Self::find_snippet) but filtered to live
    /// snippets; dead snippets are invisible to the API.
    pub fn find_live_snippet(&self, id: &Uuid) -> Option<&Snippet> {
        self.snippets.get(id).filter(|s| s.status)
    }

    pub fn find_snippet_by_title(&self, title: &str) -> Option<&Snippet> {
        self.snippets.values().find(|s| s.title == title)
    }

    pub fn create_snippet(
        &mut self,
        owner: &str,
        request: CreateSnippetRequest,
    ) -> Result<Snippet, ApiError> {
        if request.title.trim().is_empty() {
            return Err(ApiError::value_error("Snippet title cannot be empty"));
        }
        if self.find_snippet_by_title(&request.title).is_some() {
            return Err(ApiError::value_error("Snippet title already exists"));
        }

        let now = Utc::now();
        let snippet = Snippet {
            id: Uuid::new_v4(),
            title: request.title,
            owner: owner.to_string(),
            code: request.code,
            linenos: request.linenos,
            language: request.language,
            created: now,
            modified: now,
            status: true,
        };
        self.snippets.insert(snippet.id, snippet.clone());
        Ok(snippet)
    }

    pub fn update_snippet(
        &mut self,
        id: &Uuid,
        request: UpdateSnippetRequest,
    ) -> Result<Snippet, ApiError> {
        if let Some(title) = &request.title {
            if title.trim().is_empty() {
                return Err(ApiError::value_error("Snippet title cannot be empty"));
            }
            let taken = self
                .snippets
                .values()
                .any(|s| &s.title == title && &s.id != id);
            if taken {
                return Err(ApiError::value_error("Snippet title already exists"));
            }
        }

        let Some(snippet) = self.snippets.get_mut(id) else {
            return Err(ApiError::not_found("Snippet not found"));
        };

        if let Some(title) = request.title {
            snippet.title = title;
        }
        if let Some(code) = request.code {
            snippet.code = code;
        }
        if let Some(linenos) = request.linenos {
            snippet.linenos = linenos;
        }
        if let Some(language) = request.language {
            snippet.language = language;
        }
        if let Some(status) = request.status {
            snippet.status = status;
        }
        snippet.modified = Utc::now();
        Ok(snippet.clone())
    }
}
