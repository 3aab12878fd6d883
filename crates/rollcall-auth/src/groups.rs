//! Role groups.
//!
//! A [`RoleGroup`] bundles several roles under one name (for example `user` =
//! students and teachers) so a route can require "any of these". The order of
//! the roles is the group's priority: when nobody in the group is signed in,
//! the client is sent to sign in as the first role.
//!
//! Groups are built once from [`RoleGroupsConfig`] at startup and never change.
//! The [`DEFAULT_GROUP`] is always present: a configuration that leaves it out
//! gets the built-in `user=student,teacher`.

use std::collections::HashMap;

use rollcall_config::{RoleGroupsConfig, RoleGroupsParseError};
use rollcall_core::{AuthError, Role};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleGroupError {
    #[error("role group `{group}` references unknown role `{role}`")]
    UnknownRole { group: String, role: String },
    #[error("role group `{0}` must list at least one role")]
    Empty(String),
    #[error("role group `{group}` lists `{role}` more than once")]
    DuplicateRole { group: String, role: Role },
    #[error(transparent)]
    Config(#[from] RoleGroupsParseError),
}

/// Group guarding the shared routes; always registered.
pub const DEFAULT_GROUP: &str = "user";

/// Named, ordered, non-empty set of roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGroup {
    name: String,
    roles: Vec<Role>,
}

impl RoleGroup {
    pub fn new(name: impl Into<String>, roles: Vec<Role>) -> Result<Self, RoleGroupError> {
        let name = name.into();
        if roles.is_empty() {
            return Err(RoleGroupError::Empty(name));
        }
        for (i, role) in roles.iter().enumerate() {
            if roles[..i].contains(role) {
                return Err(RoleGroupError::DuplicateRole {
                    group: name,
                    role: *role,
                });
            }
        }
        Ok(Self { name, roles })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Roles in priority order.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Members of the group that are signed in, in priority order.
    pub fn active_roles(&self, signed_in: &[Role]) -> Vec<Role> {
        self.roles
            .iter()
            .copied()
            .filter(|role| signed_in.contains(role))
            .collect()
    }

    /// Grants access when at least one member role is signed in.
    ///
    /// # Errors
    ///
    /// [`AuthError::Unauthenticated`] for the group's first role when no member
    /// role has a session.
    pub fn authorize(&self, signed_in: &[Role]) -> Result<Vec<Role>, AuthError> {
        let active = self.active_roles(signed_in);
        if active.is_empty() {
            return Err(AuthError::Unauthenticated {
                role: self.roles[0],
            });
        }
        Ok(active)
    }

}

/// Registry of configured role groups, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct RoleGroups {
    groups: HashMap<String, RoleGroup>,
}

impl RoleGroups {
    pub fn from_config(config: &RoleGroupsConfig) -> Result<Self, RoleGroupError> {
        let mut groups = HashMap::new();
        for spec in &config.groups {
            let roles = spec
                .roles
                .iter()
                .map(|raw| {
                    raw.parse::<Role>().map_err(|_| RoleGroupError::UnknownRole {
                        group: spec.name.clone(),
                        role: raw.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let group = RoleGroup::new(spec.name.clone(), roles)?;
            groups.insert(group.name.clone(), group);
        }
        groups
            .entry(DEFAULT_GROUP.to_string())
            .or_insert_with(|| RoleGroup {
                name: DEFAULT_GROUP.to_string(),
                roles: Role::ALL.to_vec(),
            });
        Ok(Self { groups })
    }

    /// Groups from the built-in default (`user=student,teacher`).
    pub fn defaults() -> Self {
        Self::from_config(&RoleGroupsConfig::default()).unwrap_or_default()
    }

    /// Adds or replaces a group.
    pub fn with_group(mut self, group: RoleGroup) -> Self {
        self.groups.insert(group.name.clone(), group);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RoleGroup> {
        self.groups.get(name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_group() -> RoleGroup {
        RoleGroup::new("user", vec![Role::Student, Role::Teacher]).unwrap()
    }

    #[test]
    fn test_empty_group_is_rejected() {
        assert_eq!(
            RoleGroup::new("nobody", vec![]),
            Err(RoleGroupError::Empty("nobody".to_string()))
        );
    }

    #[test]
    fn test_duplicate_role_is_rejected() {
        assert!(matches!(
            RoleGroup::new("user", vec![Role::Student, Role::Student]),
            Err(RoleGroupError::DuplicateRole { .. })
        ));
    }

    #[test]
    fn test_authorize_without_sessions_redirects_to_first_role() {
        let err = user_group().authorize(&[]).unwrap_err();
        assert!(matches!(
            err,
            AuthError::Unauthenticated {
                role: Role::Student
            }
        ));

        let teacher_first = RoleGroup::new("user", vec![Role::Teacher, Role::Student]).unwrap();
        let err = teacher_first.authorize(&[]).unwrap_err();
        assert!(matches!(
            err,
            AuthError::Unauthenticated {
                role: Role::Teacher
            }
        ));
    }

    #[test]
    fn test_authorize_exposes_active_roles_in_priority_order() {
        let group = user_group();
        assert_eq!(group.authorize(&[Role::Teacher]).unwrap(), vec![Role::Teacher]);
        assert_eq!(
            group.authorize(&[Role::Teacher, Role::Student]).unwrap(),
            vec![Role::Student, Role::Teacher]
        );
    }

    #[test]
    fn test_registry_from_config() {
        let config = RoleGroupsConfig::parse("user=teacher,student;staff=teacher").unwrap();
        let groups = RoleGroups::from_config(&config).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups.get("user").unwrap().roles(),
            &[Role::Teacher, Role::Student]
        );
        assert_eq!(groups.get("staff").unwrap().roles(), &[Role::Teacher]);
        assert!(groups.get("admins").is_none());
    }

    #[test]
    fn test_registry_keeps_default_group_when_unconfigured() {
        let config = RoleGroupsConfig::parse("staff=teacher").unwrap();
        let groups = RoleGroups::from_config(&config).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("staff").unwrap().roles(), &[Role::Teacher]);
        assert_eq!(
            groups.get(DEFAULT_GROUP).unwrap().roles(),
            &[Role::Student, Role::Teacher]
        );
    }

    #[test]
    fn test_registry_rejects_unknown_roles() {
        let config = RoleGroupsConfig::parse("user=student,janitor").unwrap();
        assert_eq!(
            RoleGroups::from_config(&config).unwrap_err(),
            RoleGroupError::UnknownRole {
                group: "user".to_string(),
                role: "janitor".to_string()
            }
        );
    }

    #[test]
    fn test_defaults_contain_user_group() {
        let groups = RoleGroups::defaults();
        assert_eq!(
            groups.get("user").unwrap().roles(),
            &[Role::Student, Role::Teacher]
        );
    }

    #[test]
    fn test_with_group_replaces_by_name() {
        let groups = RoleGroups::defaults().with_group(
            RoleGroup::new("user", vec![Role::Teacher, Role::Student]).unwrap(),
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get("user").unwrap().roles()[0], Role::Teacher);
    }
}
