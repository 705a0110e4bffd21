//! Mappers for payments and their reconciliation.

use super::pay_period_mapper::PayPeriodMapper;
use crate::domain::models::payment::PaymentRecord as DomainPayment;
use crate::domain::summary_service::PaymentReconciliation;
use shared::{PaymentReconciliationResponse, PaymentRecord as SharedPayment};

pub struct PaymentMapper;

impl PaymentMapper {
    pub fn to_dto(domain: DomainPayment) -> SharedPayment {
        SharedPayment {
            id: domain.id,
            user_id: domain.user_id,
            paid_at: domain.paid_at,
            amount: domain.amount,
            description: domain.description,
        }
    }

    pub fn to_reconciliation_response(domain: PaymentReconciliation) -> PaymentReconciliationResponse {
        PaymentReconciliationResponse {
            period: PayPeriodMapper::to_dto(&domain.period),
            commission_due: domain.commission_due,
            total_paid: domain.total_paid,
            outstanding: domain.outstanding,
            payments: domain.payments.into_iter().map(Self::to_dto).collect(),
        }
    }
}
