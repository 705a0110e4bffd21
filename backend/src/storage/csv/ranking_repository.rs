//! # CSV Ranking Repository
//!
//! Computes the sales leaderboard from the peer and summary tables. Sales
//! of each agent are credited to the agent, their manager or their
//! superintendent depending on the view. Positions are assigned over the
//! full ranking before the search filter, so a filtered page still shows
//! everyone's real position.

use anyhow::{bail, Result};
use async_trait::async_trait;
use shared::{RankingEntry, RankingPage, RankingView};
use std::collections::HashMap;
use tracing::debug;

use super::connection::{CsvConnection, Table};
use super::peer_repository::PeerRow;
use crate::domain::models::summary::CommissionSummary;
use crate::domain::ranking_cache::normalize_search;
use crate::storage::RankingSource;

#[derive(Clone)]
pub struct RankingRepository {
    connection: CsvConnection,
}

#[derive(Debug, Default)]
struct Totals {
    sales_count: u32,
    sales_volume: f64,
}

impl RankingRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn compute_ranking(&self, view: RankingView) -> Result<Vec<RankingEntry>> {
        let peers: Vec<PeerRow> = self.connection.read_rows(Table::Peers)?;
        let summaries: Vec<CommissionSummary> = self.connection.read_rows(Table::Summaries)?;

        let peers_by_id: HashMap<&str, &PeerRow> =
            peers.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut totals: HashMap<String, Totals> = HashMap::new();
        for summary in &summaries {
            let Some(peer) = peers_by_id.get(summary.user_id.as_str()) else {
                continue;
            };
            let credited = match view {
                RankingView::Corretores => Some(peer.nickname.as_str()),
                RankingView::Gerentes => peer.gerente.as_deref(),
                RankingView::Superintendentes => peer.superintendente.as_deref(),
            };
            let Some(nickname) = credited.filter(|n| !n.trim().is_empty()) else {
                continue;
            };

            let entry = totals.entry(nickname.to_string()).or_default();
            entry.sales_count += summary.sales_count;
            entry.sales_volume += summary.sales_volume;
        }

        let mut ranked: Vec<(String, Totals)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.sales_volume
                .total_cmp(&a.1.sales_volume)
                .then(b.1.sales_count.cmp(&a.1.sales_count))
                .then(a.0.cmp(&b.0))
        });

        Ok(ranked
            .into_iter()
            .enumerate()
            .map(|(index, (nickname, totals))| RankingEntry {
                position: index as u32 + 1,
                nickname,
                sales_count: totals.sales_count,
                sales_volume: totals.sales_volume,
            })
            .collect())
    }
}

#[async_trait]
impl RankingSource for RankingRepository {
    async fn fetch_ranking(
        &self,
        view: RankingView,
        search: &str,
        page: u32,
        page_size: u32,
    ) -> Result<RankingPage> {
        if page == 0 || page_size == 0 {
            bail!("Page and page size must start at 1 (got page {}, size {})", page, page_size);
        }

        let needle = normalize_search(search);
        let matching: Vec<RankingEntry> = self
            .compute_ranking(view)?
            .into_iter()
            .filter(|e| needle.is_empty() || e.nickname.to_lowercase().contains(&needle))
            .collect();

        let total_count = matching.len() as u32;
        let skip = ((page - 1) as usize).saturating_mul(page_size as usize);
        let entries: Vec<RankingEntry> = matching
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();

        debug!(
            "Ranking {} '{}' page {}: {} of {} entries",
            view,
            needle,
            page,
            entries.len(),
            total_count
        );

        Ok(RankingPage {
            view,
            search: needle,
            page,
            page_size,
            total_count,
            entries,
        })
    }
}
