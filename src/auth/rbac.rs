//! Role-based access control for the dashboard domains.
//!
//! Permission checks are pure: no storage, no clock, no configuration.
//! The matrix is total over the enums below, with deny as the fallthrough
//! for anything that is not explicitly granted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Platform roles. `tickets_admin` is a legacy spelling of `it_admin`
/// accepted on input only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
    DatasetsAdmin,
    CybersecurityAdmin,
    #[serde(alias = "tickets_admin")]
    ItAdmin,
}

/// Business areas that scope the domain-admin roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Datasets,
    Cybersecurity,
    ItTickets,
}

/// Operations a caller may attempt within a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::DatasetsAdmin => "datasets_admin",
            Self::CybersecurityAdmin => "cybersecurity_admin",
            Self::ItAdmin => "it_admin",
        }
    }

    /// The domain a domain-admin role is elevated in, if any.
    #[must_use]
    pub const fn scope(self) -> Option<Domain> {
        match self {
            Self::DatasetsAdmin => Some(Domain::Datasets),
            Self::CybersecurityAdmin => Some(Domain::Cybersecurity),
            Self::ItAdmin => Some(Domain::ItTickets),
            Self::Admin | Self::User => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "datasets_admin" => Ok(Self::DatasetsAdmin),
            "cybersecurity_admin" => Ok(Self::CybersecurityAdmin),
            // tickets_admin predates the it_admin rename in stored records.
            "it_admin" | "tickets_admin" => Ok(Self::ItAdmin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl Domain {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Datasets => "datasets",
            Self::Cybersecurity => "cybersecurity",
            Self::ItTickets => "it_tickets",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "datasets" => Ok(Self::Datasets),
            "cybersecurity" => Ok(Self::Cybersecurity),
            "it_tickets" | "tickets" | "it" => Ok(Self::ItTickets),
            other => Err(format!("unknown domain: {other}")),
        }
    }
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// Decide whether `role` may perform `action` within `domain`.
///
/// Platform admins may do anything; plain users may only view; a domain
/// admin has full access to its own domain and view access elsewhere.
#[must_use]
pub fn check_permission(role: Role, domain: Domain, action: Action) -> bool {
    match role {
        Role::Admin => true,
        Role::User => action == Action::View,
        Role::DatasetsAdmin | Role::CybersecurityAdmin | Role::ItAdmin => {
            role.scope() == Some(domain) || action == Action::View
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_DOMAINS: [Domain; 3] = [Domain::Datasets, Domain::Cybersecurity, Domain::ItTickets];
    const ALL_ACTIONS: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    #[test]
    fn admin_allowed_everywhere() {
        for domain in ALL_DOMAINS {
            for action in ALL_ACTIONS {
                assert!(check_permission(Role::Admin, domain, action));
            }
        }
    }

    #[test]
    fn user_is_view_only() {
        for domain in ALL_DOMAINS {
            assert!(check_permission(Role::User, domain, Action::View));
            for action in [Action::Create, Action::Edit, Action::Delete] {
                assert!(!check_permission(Role::User, domain, action));
            }
        }
    }

    #[test]
    fn domain_admin_full_access_in_scope() {
        for action in ALL_ACTIONS {
            assert!(check_permission(
                Role::DatasetsAdmin,
                Domain::Datasets,
                action
            ));
            assert!(check_permission(
                Role::CybersecurityAdmin,
                Domain::Cybersecurity,
                action
            ));
            assert!(check_permission(Role::ItAdmin, Domain::ItTickets, action));
        }
    }

    #[test]
    fn domain_admin_view_only_elsewhere() {
        assert!(check_permission(
            Role::DatasetsAdmin,
            Domain::Cybersecurity,
            Action::View
        ));
        assert!(!check_permission(
            Role::DatasetsAdmin,
            Domain::Cybersecurity,
            Action::Edit
        ));
        assert!(!check_permission(
            Role::ItAdmin,
            Domain::Datasets,
            Action::Delete
        ));
        assert!(check_permission(
            Role::CybersecurityAdmin,
            Domain::ItTickets,
            Action::View
        ));
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [
            Role::Admin,
            Role::User,
            Role::DatasetsAdmin,
            Role::CybersecurityAdmin,
            Role::ItAdmin,
        ] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn legacy_tickets_admin_parses_as_it_admin() {
        assert_eq!("tickets_admin".parse::<Role>(), Ok(Role::ItAdmin));
        let decoded: Role = serde_json::from_str("\"tickets_admin\"")
            .unwrap_or_else(|err| panic!("alias should deserialize: {err}"));
        assert_eq!(decoded, Role::ItAdmin);
        // Output always uses the canonical spelling.
        assert_eq!(
            serde_json::to_string(&Role::ItAdmin).ok().as_deref(),
            Some("\"it_admin\"")
        );
    }

    #[test]
    fn unknown_labels_rejected() {
        assert!("root".parse::<Role>().is_err());
        assert!("finance".parse::<Domain>().is_err());
        assert!("approve".parse::<Action>().is_err());
    }

    #[test]
    fn domain_and_action_parse_loosely() {
        assert_eq!("Datasets".parse::<Domain>(), Ok(Domain::Datasets));
        assert_eq!("tickets".parse::<Domain>(), Ok(Domain::ItTickets));
        assert_eq!("VIEW".parse::<Action>(), Ok(Action::View));
    }
}
