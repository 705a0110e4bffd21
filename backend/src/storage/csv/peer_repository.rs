//! # CSV Peer Repository
//!
//! Reads the peer table (`peers.csv`): one row per person of the sales
//! hierarchy, tagged with the nicknames of their manager, superintendent
//! and director.
//!
//! ```csv
//! id,nickname,role,gerente,superintendente,diretor
//! u-001,ana,corretor,gabi,sofia,dora
//! u-010,sofia,superintendente,,,dora
//! ```

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::connection::{CsvConnection, Table};
use crate::domain::hierarchy::Role;
use crate::domain::models::peer::PeerRecord;
use crate::storage::PeerStorage;

/// Row as stored; the role stays a string so one bad row can't hide the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PeerRow {
    pub id: String,
    pub nickname: String,
    pub role: String,
    pub gerente: Option<String>,
    pub superintendente: Option<String>,
    pub diretor: Option<String>,
}

impl From<&PeerRecord> for PeerRow {
    fn from(record: &PeerRecord) -> Self {
        Self {
            id: record.id.clone(),
            nickname: record.nickname.clone(),
            role: record.role.to_string(),
            gerente: record.gerente.clone(),
            superintendente: record.superintendente.clone(),
            diretor: record.diretor.clone(),
        }
    }
}

#[derive(Clone)]
pub struct PeerRepository {
    connection: CsvConnection,
}

impl PeerRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Replace the peer table
    pub fn store_peers(&self, records: &[PeerRecord]) -> Result<()> {
        let rows: Vec<PeerRow> = records.iter().map(PeerRow::from).collect();
        self.connection.write_rows(Table::Peers, &rows)
    }

    fn read_peers(&self) -> Result<Vec<PeerRecord>> {
        let rows: Vec<PeerRow> = self.connection.read_rows(Table::Peers)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let role = match row.role.parse::<Role>() {
                Ok(role) => role,
                Err(e) => {
                    warn!("Skipping peer '{}': {}", row.id, e);
                    continue;
                }
            };
            records.push(PeerRecord {
                id: row.id,
                nickname: row.nickname,
                role,
                gerente: non_blank(row.gerente),
                superintendente: non_blank(row.superintendente),
                diretor: non_blank(row.diretor),
            });
        }
        Ok(records)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl PeerStorage for PeerRepository {
    async fn list_peers(&self) -> Result<Vec<PeerRecord>> {
        self.read_peers()
    }

    async fn list_superintendents_for_director(&self, director: &str) -> Result<Vec<String>> {
        let superintendents = self
            .read_peers()?
            .into_iter()
            .filter(|r| r.role == Role::Superintendente && r.diretor.as_deref() == Some(director))
            .map(|r| r.nickname)
            .collect();
        Ok(superintendents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use std::fs;

    #[tokio::test]
    async fn test_store_and_list_peers() {
        let env = TestEnvironment::with_sample_data().await.unwrap();
        let repo = PeerRepository::new(env.connection.clone());

        let peers = repo.list_peers().await.unwrap();
        assert_eq!(peers.len(), 9);

        let ana = peers.iter().find(|p| p.nickname == "ana").unwrap();
        assert_eq!(ana.role, Role::Corretor);
        assert_eq!(ana.gerente.as_deref(), Some("gabi"));
        assert_eq!(ana.superintendente.as_deref(), Some("sofia"));

        let sofia = peers.iter().find(|p| p.nickname == "sofia").unwrap();
        assert_eq!(sofia.gerente, None);
    }

    #[tokio::test]
    async fn test_superintendents_for_director() {
        let env = TestEnvironment::with_sample_data().await.unwrap();
        let repo = PeerRepository::new(env.connection.clone());

        let mut names = repo.list_superintendents_for_director("dora").await.unwrap();
        names.sort();
        assert_eq!(names, vec!["saulo", "sofia"]);

        assert!(repo
            .list_superintendents_for_director("nobody")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_rows_with_unknown_role_are_skipped() {
        let env = TestEnvironment::new().await.unwrap();
        fs::write(
            env.connection.table_path(Table::Peers),
            "id,nickname,role,gerente,superintendente,diretor\n\
             u-1,ana,corretor,gabi,sofia,dora\n\
             u-2,zeca,estagiario,gabi,sofia,dora\n",
        )
        .unwrap();

        let repo = PeerRepository::new(env.connection.clone());
        let peers = repo.list_peers().await.unwrap();
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].nickname, "ana");
    }

    #[tokio::test]
    async fn test_empty_table() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = PeerRepository::new(env.connection.clone());
        assert!(repo.list_peers().await.unwrap().is_empty());
    }
}
