/// Route Table Module Index
///
/// Organizes the portal's views into access tiers. Each tier module declares
/// its routes with explicit capability flags; nothing is inherited from a
/// parent route or from the tier a route is declared in.

/// Views reachable by anyone (landing page, login, registration).
pub mod public;

/// Views that need a stored token.
pub mod authenticated;

/// Views restricted to admins. Every route here also requires a token.
pub mod admin;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{RouteSummary, ViewId};

/// RouteAccess
///
/// The capability flags attached to a route at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteAccess {
    pub requires_auth: bool,
    pub admin_only: bool,
}

impl RouteAccess {
    pub const PUBLIC: RouteAccess = RouteAccess {
        requires_auth: false,
        admin_only: false,
    };
    pub const AUTHENTICATED: RouteAccess = RouteAccess {
        requires_auth: true,
        admin_only: false,
    };
    pub const ADMIN: RouteAccess = RouteAccess {
        requires_auth: true,
        admin_only: true,
    };
}

/// RouteDef
///
/// A declared route. Children are declared with paths relative to the parent
/// and flattened into independent entries when the table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub path: String,
    pub name: String,
    pub access: RouteAccess,
    pub view: ViewId,
    pub children: Vec<RouteDef>,
}

impl RouteDef {
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: ViewId) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            access: RouteAccess::PUBLIC,
            view,
            children: Vec::new(),
        }
    }

    pub fn with_access(mut self, access: RouteAccess) -> Self {
        self.access = access;
        self
    }

    pub fn requires_auth(mut self) -> Self {
        self.access.requires_auth = true;
        self
    }

    pub fn admin_only(mut self) -> Self {
        self.access.admin_only = true;
        self
    }

    pub fn child(mut self, child: RouteDef) -> Self {
        self.children.push(child);
        self
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            path: self.path.clone(),
            name: self.name.clone(),
            requires_auth: self.access.requires_auth,
            admin_only: self.access.admin_only,
            view: self.view,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route path {0:?} must start with '/'")]
    InvalidPath(String),
    #[error("nested route path {0:?} must be relative to its parent")]
    AbsoluteChildPath(String),
    #[error("route name {0:?} is declared more than once")]
    DuplicateName(String),
    #[error("route path {0:?} is declared more than once")]
    DuplicatePath(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Static(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct TableEntry {
    route: RouteDef,
    segments: Vec<Segment>,
}

/// RouteMatch
///
/// A resolved route plus the values captured by its `:param` segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDef,
    pub params: BTreeMap<String, String>,
}

/// RouteTable
///
/// Immutable, ordered registry of flattened routes. Lookup is first match in
/// declaration order, parents before their children.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<TableEntry>,
    case_sensitive: bool,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDef>, case_sensitive: bool) -> Result<Self, RouteTableError> {
        let mut entries = Vec::new();
        for route in routes {
            if !route.path.starts_with('/') {
                return Err(RouteTableError::InvalidPath(route.path));
            }
            flatten(route, "", &mut entries)?;
        }

        let mut names = HashSet::new();
        let mut patterns = HashSet::new();
        for entry in &entries {
            if !names.insert(entry.route.name.clone()) {
                return Err(RouteTableError::DuplicateName(entry.route.name.clone()));
            }
            let key: Vec<Segment> = entry
                .segments
                .iter()
                .map(|segment| match segment {
                    // Folds the same way matching compares: ASCII only.
                    Segment::Static(s) if !case_sensitive => {
                        Segment::Static(s.to_ascii_lowercase())
                    }
                    Segment::Static(s) => Segment::Static(s.clone()),
                    // Parameter names don't distinguish patterns.
                    Segment::Param(_) => Segment::Param(String::new()),
                })
                .collect();
            if !patterns.insert(key) {
                return Err(RouteTableError::DuplicatePath(entry.route.path.clone()));
            }
        }

        Ok(Self {
            entries,
            case_sensitive,
        })
    }

    /// resolve
    ///
    /// Returns the route definition a path navigates to, if any.
    pub fn resolve(&self, path: &str) -> Option<&RouteDef> {
        self.match_path(path).map(|matched| matched.route)
    }

    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let requested = split_segments(strip_query(path));

        self.entries.iter().find_map(|entry| {
            if entry.segments.len() != requested.len() {
                return None;
            }
            let mut params = BTreeMap::new();
            for (pattern, actual) in entry.segments.iter().zip(&requested) {
                match pattern {
                    Segment::Static(expected) => {
                        let same = if self.case_sensitive {
                            expected == actual
                        } else {
                            expected.eq_ignore_ascii_case(actual)
                        };
                        if !same {
                            return None;
                        }
                    }
                    Segment::Param(name) => {
                        params.insert(name.clone(), (*actual).to_string());
                    }
                }
            }
            Some(RouteMatch {
                route: &entry.route,
                params,
            })
        })
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteDef> {
        self.entries
            .iter()
            .map(|entry| &entry.route)
            .find(|route| route.name == name)
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteDef> {
        self.entries.iter().map(|entry| &entry.route)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.routes().map(RouteDef::summary).collect()
    }
}

/// portal_route_table
///
/// Assembles the portal's full route table from the three access tiers.
pub fn portal_route_table(case_sensitive: bool) -> Result<RouteTable, RouteTableError> {
    let routes = public::public_routes()
        .into_iter()
        .chain(authenticated::authenticated_routes())
        .chain(admin::admin_routes())
        .collect();
    RouteTable::new(routes, case_sensitive)
}

fn flatten(
    route: RouteDef,
    parent: &str,
    entries: &mut Vec<TableEntry>,
) -> Result<(), RouteTableError> {
    let full_path = if parent.is_empty() {
        route.path.clone()
    } else {
        if route.path.starts_with('/') {
            return Err(RouteTableError::AbsoluteChildPath(route.path));
        }
        format!("{}/{}", parent.trim_end_matches('/'), route.path)
    };

    let segments = split_segments(&full_path)
        .into_iter()
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Static(segment.to_string()),
        })
        .collect();

    let RouteDef {
        name,
        access,
        view,
        children,
        ..
    } = route;

    entries.push(TableEntry {
        route: RouteDef {
            path: full_path.clone(),
            name,
            access,
            view,
            children: Vec::new(),
        },
        segments,
    });

    for child in children {
        flatten(child, &full_path, entries)?;
    }
    Ok(())
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}
