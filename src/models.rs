use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::charts::{ChartComponent, ChartKind};

// --- Credential Schemas ---

/// UserRecord
///
/// The user record stored next to the token by the login flow. Only `is_admin`
/// takes part in access decisions; the other fields are carried for display.
/// The `Default` value is the no-privilege record that every malformed or
/// missing `user` slot degrades to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    // The RBAC field. Only a literal JSON `true` grants admin access.
    #[serde(default)]
    pub is_admin: bool,
}

impl UserRecord {
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            ..Self::default()
        }
    }

    /// from_serialized
    ///
    /// Lenient parse of the serialized `user` slot. Never fails: anything that
    /// is not a JSON object yields the empty record, and fields with the wrong
    /// type are dropped individually rather than rejecting the whole record.
    pub fn from_serialized(raw: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => return Self::default(),
        };

        let Some(object) = value.as_object() else {
            return Self::default();
        };

        Self {
            id: object.get("id").and_then(serde_json::Value::as_i64),
            name: object
                .get("name")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            email: object
                .get("email")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            is_admin: matches!(object.get("is_admin"), Some(serde_json::Value::Bool(true))),
        }
    }
}

/// CredentialState
///
/// A snapshot of the two credential slots taken at decision time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialState {
    pub token: Option<String>,
    pub user: UserRecord,
}

impl CredentialState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(token: impl Into<String>, user: UserRecord) -> Self {
        Self {
            token: Some(token.into()),
            user,
        }
    }

    /// Presence only. Token validity is the backend's concern.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user.is_admin
    }
}

// --- Routing Schemas ---

/// ViewId
///
/// Identifies the view component a route renders. Views themselves live in
/// the front end; the portal only needs to name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewId {
    Home,
    Login,
    Register,
    UserDashboard,
    Profile,
    AdminDashboard,
    AddParkingLots,
}

/// NavigationDecision
///
/// The guard's verdict for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "target", rename_all = "snake_case")]
pub enum NavigationDecision {
    Allow,
    RedirectTo(String),
}

impl NavigationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, NavigationDecision::Allow)
    }

    /// The redirect target, in the shape the host hook's `proceed` expects.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            NavigationDecision::Allow => None,
            NavigationDecision::RedirectTo(path) => Some(path),
        }
    }
}

/// Location
///
/// Where a completed navigation landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    pub name: String,
    pub view: ViewId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    // The originally requested path when the guard redirected at least once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<String>,
}

/// HistoryEntry
///
/// One completed navigation in a navigator session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub location: Location,
    pub at: DateTime<Utc>,
}

/// --- Request/Response Payloads ---

/// NavigationRequest
///
/// Input payload for POST /api/navigation. `user` is the raw serialized slot
/// content, so malformed records can be exercised exactly as stored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NavigationRequest {
    pub path: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// RouteSummary
///
/// Flattened route table entry exposed by GET /api/routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteSummary {
    pub path: String,
    pub name: String,
    pub requires_auth: bool,
    pub admin_only: bool,
    pub view: ViewId,
}

/// ChartSummary
///
/// Registered chart component exposed by GET /api/charts.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSummary {
    pub component: ChartComponent,
    pub kind: ChartKind,
}
