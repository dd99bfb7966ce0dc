use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform role as reported by the backend. The wire form may carry a
/// `ROLE_` prefix and use either `-` or `_` as separator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Student,
    Teacher,
    Admin,
    SuperAdmin,
    Unknown(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_uppercase().replace('-', "_");
        let bare = normalized.strip_prefix("ROLE_").unwrap_or(&normalized);
        match bare {
            "STUDENT" => Role::Student,
            "TEACHER" | "PROFESSOR" => Role::Teacher,
            "ADMIN" => Role::Admin,
            "SUPER_ADMIN" | "SUPERADMIN" => Role::SuperAdmin,
            _ => Role::Unknown(raw.trim().to_string()),
        }
    }

    /// Wire form without the `ROLE_` prefix, as the user forms submit it.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Student => "STUDENT",
            Role::Teacher => "TEACHER",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Unknown(s) => s.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Admin => "Admin",
            Role::SuperAdmin => "Super admin",
            Role::Unknown(s) => s.as_str(),
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self, Role::Student)
    }

    pub fn is_teacher(&self) -> bool {
        matches!(self, Role::Teacher)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Teachers and administrators see the management pages.
    pub fn is_staff(&self) -> bool {
        self.is_teacher() || self.is_admin()
    }

    pub fn satisfies(&self, gate: RoleGate) -> bool {
        match gate {
            RoleGate::Staff => self.is_staff(),
            RoleGate::Admin => self.is_admin(),
        }
    }

    /// Role for a user form; unrecognised input is rejected rather than
    /// passed through.
    pub fn parse_assignable(raw: &str) -> Result<Role, String> {
        match Role::parse(raw) {
            Role::Unknown(other) => Err(format!("Unknown role: {}", other)),
            role => Ok(role),
        }
    }

    pub fn all_assignable() -> [Role; 4] {
        [Role::Student, Role::Teacher, Role::Admin, Role::SuperAdmin]
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum role a route or action requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleGate {
    Staff,
    Admin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignable_roles_reject_unknown_input() {
        assert_eq!(Role::parse_assignable("role_admin"), Ok(Role::Admin));
        assert_eq!(Role::parse_assignable("super-admin"), Ok(Role::SuperAdmin));
        assert_eq!(Role::parse_assignable("WIZARD"), Err("Unknown role: WIZARD".to_string()));
    }

    #[test]
    fn parses_prefixed_and_bare_roles() {
        assert_eq!(Role::parse("ROLE_TEACHER"), Role::Teacher);
        assert_eq!(Role::parse("student"), Role::Student);
        assert_eq!(Role::parse("ROLE_SUPER-ADMIN"), Role::SuperAdmin);
        assert_eq!(Role::parse(" admin "), Role::Admin);
    }

    #[test]
    fn unknown_roles_are_kept_verbatim() {
        let role = Role::parse("ROLE_GUEST");
        assert_eq!(role, Role::Unknown("ROLE_GUEST".into()));
        assert!(!role.is_staff());
        assert!(!role.is_student());
    }

    #[test]
    fn gates() {
        assert!(Role::Teacher.satisfies(RoleGate::Staff));
        assert!(Role::SuperAdmin.satisfies(RoleGate::Staff));
        assert!(!Role::Student.satisfies(RoleGate::Staff));
        assert!(!Role::Teacher.satisfies(RoleGate::Admin));
        assert!(Role::Admin.satisfies(RoleGate::Admin));
    }
}
