//! Role-specific wording for predicted grades.
//!
//! Lookups take the grade symbol as text so that they stay total: anything
//! outside the six known symbols gets the table's default.

mod tables;

use crate::prediction::GradeSymbol;
use serde::{Deserialize, Serialize};

pub use tables::{
    authority_action, badge_color, customer_message, owner_recommendation, summary,
    DEFAULT_AUTHORITY_ACTION, DEFAULT_BADGE_COLOR, DEFAULT_CUSTOMER_MESSAGE,
    DEFAULT_OWNER_RECOMMENDATION, DEFAULT_SUMMARY,
};

/// Audience a prediction is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Owner,
    Authority,
}

impl Role {
    pub const fn ordered() -> [Self; 3] {
        [Self::Customer, Self::Owner, Self::Authority]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Owner => "Restaurant Owner",
            Self::Authority => "Health Authority",
        }
    }

    pub fn messaging(self) -> &'static dyn RoleMessaging {
        match self {
            Self::Customer => &CustomerMessaging,
            Self::Owner => &OwnerMessaging,
            Self::Authority => &AuthorityMessaging,
        }
    }

    pub fn guidance(self, grade: &str) -> &'static str {
        self.messaging().guidance(grade)
    }

    pub fn summary(self, grade: &str) -> &'static str {
        self.messaging().summary(grade)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "owner" | "restaurant owner" | "restaurant_owner" => Ok(Self::Owner),
            "authority" | "health authority" | "health_authority" => Ok(Self::Authority),
            other => Err(format!(
                "unknown role '{other}' (expected customer, owner or authority)"
            )),
        }
    }
}

/// Messaging surface shared by every role.
pub trait RoleMessaging: Send + Sync {
    fn role(&self) -> Role;

    /// Main text for the role: a message, a recommendation or an action.
    fn guidance(&self, grade: &str) -> &'static str;

    /// One-line headline shown above the badge.
    fn summary(&self, grade: &str) -> &'static str {
        summary(self.role(), grade)
    }

    fn badge_color(&self, grade: &str) -> &'static str {
        badge_color(grade)
    }
}

pub struct CustomerMessaging;
pub struct OwnerMessaging;
pub struct AuthorityMessaging;

impl RoleMessaging for CustomerMessaging {
    fn role(&self) -> Role {
        Role::Customer
    }

    fn guidance(&self, grade: &str) -> &'static str {
        customer_message(grade)
    }
}

impl RoleMessaging for OwnerMessaging {
    fn role(&self) -> Role {
        Role::Owner
    }

    fn guidance(&self, grade: &str) -> &'static str {
        owner_recommendation(grade)
    }
}

impl RoleMessaging for AuthorityMessaging {
    fn role(&self) -> Role {
        Role::Authority
    }

    fn guidance(&self, grade: &str) -> &'static str {
        authority_action(grade)
    }
}

/// Messages for a typed grade, which can never hit a default.
#[derive(Debug, Clone, Serialize)]
pub struct GradeMessages {
    pub role: Role,
    pub role_label: &'static str,
    pub grade: GradeSymbol,
    pub badge_color: &'static str,
    pub summary: &'static str,
    pub guidance: &'static str,
}

impl GradeMessages {
    pub fn new(role: Role, grade: GradeSymbol) -> Self {
        let messaging = role.messaging();
        Self {
            role,
            role_label: role.label(),
            grade,
            badge_color: messaging.badge_color(grade.as_str()),
            summary: messaging.summary(grade.as_str()),
            guidance: messaging.guidance(grade.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_dispatches_to_its_own_table() {
        for role in Role::ordered() {
            assert_eq!(role.messaging().role(), role);
        }
        assert_eq!(Role::Customer.guidance("A"), customer_message("A"));
        assert_eq!(Role::Owner.guidance("B"), owner_recommendation("B"));
        assert_eq!(Role::Authority.guidance("C"), authority_action("C"));
    }

    #[test]
    fn roles_parse_from_labels_and_keys() {
        assert_eq!("owner".parse::<Role>(), Ok(Role::Owner));
        assert_eq!("Health Authority".parse::<Role>(), Ok(Role::Authority));
        assert_eq!(" Customer ".parse::<Role>(), Ok(Role::Customer));
        assert!("inspector".parse::<Role>().is_err());
    }

    #[test]
    fn grade_messages_never_use_defaults() {
        for role in Role::ordered() {
            for grade in GradeSymbol::ordered() {
                let messages = GradeMessages::new(role, grade);
                assert_ne!(messages.summary, DEFAULT_SUMMARY);
                assert!(!messages.guidance.is_empty());
                assert!(messages.badge_color.starts_with('#'));
            }
        }
    }
}
