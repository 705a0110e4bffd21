//! Domain model for a row of the peer table.
use crate::domain::hierarchy::{HierarchyField, Role};

#[derive(Debug, Clone, PartialEq)]
pub struct PeerRecord {
    pub id: String,
    /// Nickname of the person this row describes; the identifier used by
    /// every hierarchy field
    pub nickname: String,
    pub role: Role,
    pub gerente: Option<String>,
    pub superintendente: Option<String>,
    pub diretor: Option<String>,
}

impl PeerRecord {
    /// Value of one hierarchy field for this row
    pub fn field(&self, field: HierarchyField) -> Option<&str> {
        match field {
            HierarchyField::Nickname => Some(self.nickname.as_str()),
            HierarchyField::Gerente => self.gerente.as_deref(),
            HierarchyField::Superintendente => self.superintendente.as_deref(),
            HierarchyField::Diretor => self.diretor.as_deref(),
        }
    }
}
