//! Role hierarchy visibility.
//!
//! Decides which peer records a caller may see. Agents see themselves,
//! managers and superintendents see the rows that name them, directors see
//! the rows under the superintendents that report to them, and admins see
//! everything. Anything that cannot be resolved fails closed.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::models::peer::PeerRecord;
use crate::error::PortalResult;
use crate::storage::PeerStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Corretor,
    Gerente,
    Superintendente,
    Diretor,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "corretor" | "agent" => Ok(Role::Corretor),
            "gerente" | "manager" => Ok(Role::Gerente),
            "superintendente" | "superintendent" => Ok(Role::Superintendente),
            "diretor" | "director" => Ok(Role::Diretor),
            "admin" | "administrador" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Corretor => "corretor",
            Role::Gerente => "gerente",
            Role::Superintendente => "superintendente",
            Role::Diretor => "diretor",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// Columns of the peer table that hold hierarchy identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HierarchyField {
    Nickname,
    Gerente,
    Superintendente,
    Diretor,
}

impl HierarchyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyField::Nickname => "nickname",
            HierarchyField::Gerente => "gerente",
            HierarchyField::Superintendente => "superintendente",
            HierarchyField::Diretor => "diretor",
        }
    }
}

/// The caller asking for records
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    /// Role as received; parsed here so unknown values can fail closed
    pub role: String,
    pub identifier: String,
    pub view_as_admin: bool,
}

impl Viewer {
    pub fn new(role: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            identifier: identifier.into(),
            view_as_admin: false,
        }
    }

    pub fn as_admin(mut self) -> Self {
        self.view_as_admin = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityScope {
    Everything,
    /// Rows whose `field` holds one of `identifiers`
    Matching {
        field: HierarchyField,
        identifiers: BTreeSet<String>,
    },
    Nothing,
}

impl VisibilityScope {
    fn matching(field: HierarchyField, identifier: &str) -> Self {
        VisibilityScope::Matching {
            field,
            identifiers: BTreeSet::from([identifier.to_string()]),
        }
    }

    pub fn allows(&self, record: &PeerRecord) -> bool {
        match self {
            VisibilityScope::Everything => true,
            VisibilityScope::Matching { field, identifiers } => record
                .field(*field)
                .map(|value| identifiers.contains(value))
                .unwrap_or(false),
            VisibilityScope::Nothing => false,
        }
    }

    pub fn apply(&self, records: Vec<PeerRecord>) -> Vec<PeerRecord> {
        match self {
            VisibilityScope::Everything => records,
            VisibilityScope::Nothing => Vec::new(),
            _ => records.into_iter().filter(|r| self.allows(r)).collect(),
        }
    }
}

/// Resolves visibility scopes against the peer table
#[derive(Clone)]
pub struct RoleHierarchyService {
    peers: Arc<dyn PeerStorage>,
}

impl RoleHierarchyService {
    pub fn new(peers: Arc<dyn PeerStorage>) -> Self {
        Self { peers }
    }

    /// Work out what `viewer` may see. Only directors need a lookup.
    pub async fn resolve_scope(&self, viewer: &Viewer) -> PortalResult<VisibilityScope> {
        if viewer.view_as_admin {
            debug!("Admin override for '{}'", viewer.identifier);
            return Ok(VisibilityScope::Everything);
        }

        let role = match viewer.role.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                warn!("{}; returning no records for '{}'", e, viewer.identifier);
                return Ok(VisibilityScope::Nothing);
            }
        };

        if role == Role::Admin {
            return Ok(VisibilityScope::Everything);
        }

        let identifier = viewer.identifier.trim();
        if identifier.is_empty() {
            warn!("Empty identifier for role {}; returning no records", role);
            return Ok(VisibilityScope::Nothing);
        }

        let scope = match role {
            Role::Corretor => VisibilityScope::matching(HierarchyField::Nickname, identifier),
            Role::Gerente => VisibilityScope::matching(HierarchyField::Gerente, identifier),
            Role::Superintendente => {
                VisibilityScope::matching(HierarchyField::Superintendente, identifier)
            }
            Role::Diretor => {
                let superintendents: BTreeSet<String> = self
                    .peers
                    .list_superintendents_for_director(identifier)
                    .await?
                    .into_iter()
                    .collect();

                if superintendents.is_empty() {
                    info!("Director '{}' has no superintendents", identifier);
                    VisibilityScope::Nothing
                } else {
                    VisibilityScope::Matching {
                        field: HierarchyField::Superintendente,
                        identifiers: superintendents,
                    }
                }
            }
            Role::Admin => VisibilityScope::Everything,
        };

        Ok(scope)
    }

    /// Resolve the scope and apply it to the peer table
    pub async fn visible_records(
        &self,
        viewer: &Viewer,
    ) -> PortalResult<(VisibilityScope, Vec<PeerRecord>)> {
        let scope = self.resolve_scope(viewer).await?;
        if scope == VisibilityScope::Nothing {
            return Ok((scope, Vec::new()));
        }

        let records = scope.apply(self.peers.list_peers().await?);
        info!(
            "{} visible records for '{}' ({})",
            records.len(),
            viewer.identifier,
            viewer.role
        );
        Ok((scope, records))
    }
}
