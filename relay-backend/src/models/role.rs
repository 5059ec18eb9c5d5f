use serde::{Deserialize, Serialize};

/// Color applied when a role is created without one
pub const DEFAULT_ROLE_COLOR: &str = "#FFFFFF";

/// Body of a role creation request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRoleRequest {
    #[serde(default)]
    pub name: String,
    pub color: Option<String>,
    pub permissions: Option<Vec<String>>,
}

/// Role creation parameters after defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub name: String,
    pub color: String,
    pub permissions: Vec<String>,
}

impl From<CreateRoleRequest> for NewRole {
    fn from(req: CreateRoleRequest) -> Self {
        Self {
            name: req.name,
            color: req.color.unwrap_or_else(|| DEFAULT_ROLE_COLOR.to_string()),
            permissions: req.permissions.unwrap_or_default(),
        }
    }
}

/// A role as echoed back after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub id: String,
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
    pub permissions: Vec<String>,
}
