//! Authenticated caller identity.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{SalesRepId, TypeConstraintError};

/// Roles allowed to use the sales API.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sales,
    Admin,
}

impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(Role::Sales),
            "admin" => Ok(Role::Admin),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "role '{other}' is not permitted"
            ))),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Sales => write!(f, "sales"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Identity resolved from a bearer token. Derived per request, never persisted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    /// The principal as owner of client records.
    pub fn sales_rep_id(&self) -> Result<SalesRepId, TypeConstraintError> {
        SalesRepId::new(self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_sales_and_admin_roles_parse() {
        assert_eq!("sales".parse::<Role>(), Ok(Role::Sales));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("viewer".parse::<Role>().is_err());
        assert!("Sales".parse::<Role>().is_err());
    }
}
