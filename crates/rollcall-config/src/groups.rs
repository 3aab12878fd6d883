//! Role group configuration.
//!
//! Groups are read from `ROLE_GROUPS` as `;`-separated `name=role,role` entries,
//! for example `user=student,teacher;staff=teacher`. The order of roles inside an
//! entry is the group's priority order: the first listed role is where
//! unauthenticated requests are sent to sign in.
//!
//! Role names are kept as strings here and resolved by `rollcall-auth`.

use std::env;

pub const DEFAULT_ROLE_GROUPS: &str = "user=student,teacher";

/// One `name=role,role` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleGroupSpec {
    pub name: String,
    pub roles: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleGroupsConfig {
    pub groups: Vec<RoleGroupSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleGroupsParseError {
    #[error("role group entry `{0}` must look like name=role,role")]
    MalformedEntry(String),
    #[error("role group `{0}` lists no roles")]
    EmptyGroup(String),
    #[error("role group `{0}` is defined more than once")]
    DuplicateGroup(String),
}

impl Default for RoleGroupsConfig {
    fn default() -> Self {
        // The default literal is well-formed.
        Self::parse(DEFAULT_ROLE_GROUPS).unwrap_or(Self { groups: Vec::new() })
    }
}

impl RoleGroupsConfig {
    pub fn from_env() -> Result<Self, RoleGroupsParseError> {
        match env::var("ROLE_GROUPS") {
            Ok(raw) if !raw.trim().is_empty() => Self::parse(&raw),
            _ => Ok(Self::default()),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, RoleGroupsParseError> {
        let mut groups: Vec<RoleGroupSpec> = Vec::new();

        for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, roles) = entry
                .split_once('=')
                .ok_or_else(|| RoleGroupsParseError::MalformedEntry(entry.to_string()))?;

            let name = name.trim();
            if name.is_empty() {
                return Err(RoleGroupsParseError::MalformedEntry(entry.to_string()));
            }
            if groups.iter().any(|g| g.name == name) {
                return Err(RoleGroupsParseError::DuplicateGroup(name.to_string()));
            }

            let roles: Vec<String> = roles
                .split(',')
                .map(|r| r.trim().to_lowercase())
                .filter(|r| !r.is_empty())
                .collect();
            if roles.is_empty() {
                return Err(RoleGroupsParseError::EmptyGroup(name.to_string()));
            }

            groups.push(RoleGroupSpec {
                name: name.to_string(),
                roles,
            });
        }

        Ok(Self { groups })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_group_is_student_first() {
        let config = RoleGroupsConfig::default();
        assert_eq!(config.groups.len(), 1);
        assert_eq!(config.groups[0].name, "user");
        assert_eq!(config.groups[0].roles, vec!["student", "teacher"]);
    }

    #[test]
    fn test_parse_multiple_groups_preserves_order() {
        let config = RoleGroupsConfig::parse("user=Teacher, student; staff=teacher").unwrap();
        assert_eq!(config.groups[0].roles, vec!["teacher", "student"]);
        assert_eq!(config.groups[1].name, "staff");
    }

    #[test]
    fn test_parse_rejects_malformed_entries() {
        assert_eq!(
            RoleGroupsConfig::parse("user"),
            Err(RoleGroupsParseError::MalformedEntry("user".to_string()))
        );
        assert_eq!(
            RoleGroupsConfig::parse("user= , "),
            Err(RoleGroupsParseError::EmptyGroup("user".to_string()))
        );
        assert_eq!(
            RoleGroupsConfig::parse("user=student;user=teacher"),
            Err(RoleGroupsParseError::DuplicateGroup("user".to_string()))
        );
    }
}
