use serde::{Deserialize, Serialize};

/// Role tag supplied by the identity provider alongside the principal id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "TEACHER" => Self::Teacher,
            _ => Self::Student,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Teacher => "TEACHER",
        }
    }
}

/// Authenticated caller, resolved by the identity provider and threaded
/// explicitly into every mutating operation. The engine trusts the id and
/// role as given and never reaches into ambient session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub role: Role,
}

impl Principal {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn teacher(id: i64) -> Self {
        Self::new(id, Role::Teacher)
    }

    pub fn student(id: i64) -> Self {
        Self::new(id, Role::Student)
    }
}
