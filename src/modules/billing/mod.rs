// Billing engine: proration, invoice assembly and the monthly cycle

pub mod models;
pub mod services;

pub use models::{BillingMonth, BillingTrigger};
pub use services::{InvoiceBuilder, MonthlyBillingOutcome, MonthlyBillingService};
