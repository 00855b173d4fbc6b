use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::ROLE_ADMIN;

/// Identity extracted from a verified ID token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Provider user id (token `sub`)
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role() {
        let mut user = AuthenticatedUser {
            uid: "uid-1".to_string(),
            phone_number: Some("+13105550100".to_string()),
            roles: vec![],
        };
        assert!(!user.is_admin());

        user.roles.push(ROLE_ADMIN.to_string());
        assert!(user.is_admin());
        assert!(!user.has_role("vendor"));
    }
}
