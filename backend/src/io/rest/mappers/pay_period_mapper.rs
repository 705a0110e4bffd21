//! Mapper for converting pay periods to their wire form.

use crate::domain::pay_period::PayPeriod as DomainPayPeriod;
use shared::PayPeriod as SharedPayPeriod;

pub struct PayPeriodMapper;

impl PayPeriodMapper {
    /// Both string forms of each boundary come from the same date
    pub fn to_dto(domain: &DomainPayPeriod) -> SharedPayPeriod {
        SharedPayPeriod {
            anchor: domain.anchor().to_rfc3339(),
            start_date: domain.start_iso(),
            end_date: domain.end_iso(),
            start_display: domain.start_display(),
            end_display: domain.end_display(),
        }
    }
}
