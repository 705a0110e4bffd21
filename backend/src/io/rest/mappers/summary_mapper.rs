//! Mappers for commission summaries and the user's current period.

use super::pay_period_mapper::PayPeriodMapper;
use crate::domain::models::summary::CommissionSummary as DomainSummary;
use crate::domain::summary_service::UserPeriod;
use shared::{CommissionSummary as SharedSummary, CurrentPeriodResponse};

pub struct SummaryMapper;

impl SummaryMapper {
    pub fn to_dto(domain: DomainSummary) -> SharedSummary {
        SharedSummary {
            id: domain.id,
            user_id: domain.user_id,
            created_at: domain.created_at,
            sales_count: domain.sales_count,
            sales_volume: domain.sales_volume,
            commission_due: domain.commission_due,
        }
    }

    pub fn to_current_period_response(domain: UserPeriod) -> CurrentPeriodResponse {
        CurrentPeriodResponse {
            period: PayPeriodMapper::to_dto(&domain.period),
            summary: Self::to_dto(domain.summary),
            has_summary: domain.has_summary,
        }
    }
}
