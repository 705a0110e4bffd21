//! Mappers for peer records and visibility scopes.

use crate::domain::hierarchy::{Role as DomainRole, Viewer, VisibilityScope as DomainScope};
use crate::domain::models::peer::PeerRecord as DomainPeerRecord;
use shared::{
    PeerRecord as SharedPeerRecord, Role as SharedRole, VisibilityScope as SharedScope,
    VisiblePeersRequest,
};

pub struct PeerMapper;

impl PeerMapper {
    pub fn to_dto(domain: DomainPeerRecord) -> SharedPeerRecord {
        SharedPeerRecord {
            id: domain.id,
            nickname: domain.nickname,
            role: Self::role_to_dto(domain.role),
            gerente: domain.gerente,
            superintendente: domain.superintendente,
            diretor: domain.diretor,
        }
    }

    pub fn role_to_dto(role: DomainRole) -> SharedRole {
        match role {
            DomainRole::Corretor => SharedRole::Corretor,
            DomainRole::Gerente => SharedRole::Gerente,
            DomainRole::Superintendente => SharedRole::Superintendente,
            DomainRole::Diretor => SharedRole::Diretor,
            DomainRole::Admin => SharedRole::Admin,
        }
    }

    pub fn scope_to_dto(scope: DomainScope) -> SharedScope {
        match scope {
            DomainScope::Everything => SharedScope::Everything,
            DomainScope::Matching { field, identifiers } => SharedScope::Matching {
                field: field.as_str().to_string(),
                identifiers: identifiers.into_iter().collect(),
            },
            DomainScope::Nothing => SharedScope::Nothing,
        }
    }

    /// The role stays a raw string so unknown roles reach the domain and fail closed there
    pub fn to_viewer(request: VisiblePeersRequest) -> Viewer {
        let viewer = Viewer::new(request.role, request.identifier);
        if request.view_as_admin {
            viewer.as_admin()
        } else {
            viewer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hierarchy::HierarchyField;
    use std::collections::BTreeSet;

    #[test]
    fn test_scope_to_dto_sorts_identifiers() {
        let scope = DomainScope::Matching {
            field: HierarchyField::Superintendente,
            identifiers: BTreeSet::from(["sofia".to_string(), "saulo".to_string()]),
        };

        assert_eq!(
            PeerMapper::scope_to_dto(scope),
            SharedScope::Matching {
                field: "superintendente".to_string(),
                identifiers: vec!["saulo".to_string(), "sofia".to_string()],
            }
        );
        assert_eq!(PeerMapper::scope_to_dto(DomainScope::Nothing), SharedScope::Nothing);
    }

    #[test]
    fn test_to_viewer_keeps_raw_role() {
        let viewer = PeerMapper::to_viewer(VisiblePeersRequest {
            role: "Estagiário".to_string(),
            identifier: "ana".to_string(),
            view_as_admin: false,
        });
        assert_eq!(viewer, Viewer::new("Estagiário", "ana"));
    }
}
