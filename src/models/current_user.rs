use serde::{Deserialize, Serialize};

use crate::models::role::Role;

/// The signed-in user as exposed to templates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
