use core::str::FromStr;

use serde::{Deserialize, Serialize};

use carlot_core::DomainError;

/// Role granted to a marketplace account.
///
/// The role stored on the user record is authoritative; the copy embedded in
/// a session token is only a login-time snapshot and is never used for
/// authorization decisions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Role::Buyer),
            "seller" => Ok(Role::Seller),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::validation(format!(
                "role must be one of: buyer, seller, admin (got '{other}')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_and_display() {
        for (s, role) in [("buyer", Role::Buyer), ("seller", Role::Seller), ("admin", Role::Admin)] {
            assert_eq!(s.parse::<Role>().unwrap(), role);
            assert_eq!(role.to_string(), s);
        }
    }

    #[test]
    fn unknown_role_is_a_validation_error() {
        assert!(matches!(
            "superuser".parse::<Role>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
