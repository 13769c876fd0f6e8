use serde::{Deserialize, Serialize};

/// Roles are owned by the external identity system; this engine only reads
/// them through the `IdentityDirectory` collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Teacher,
    Supervisor,
    Admin,
}

impl Role {
    /// Supervisors and admins hold elevated access across all courses.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Supervisor | Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"STUDENT\"");
        assert_eq!(
            serde_json::to_string(&Role::Supervisor).unwrap(),
            "\"SUPERVISOR\""
        );
    }

    #[test]
    fn only_supervisor_and_admin_are_elevated() {
        assert!(!Role::Student.is_elevated());
        assert!(!Role::Teacher.is_elevated());
        assert!(Role::Supervisor.is_elevated());
        assert!(Role::Admin.is_elevated());
    }
}
