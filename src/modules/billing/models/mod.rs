mod billing_month;
mod trigger;

pub use billing_month::{days_in_month, BillingMonth};
pub use trigger::BillingTrigger;
