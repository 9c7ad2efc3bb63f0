pub mod invoice_builder;
pub mod monthly_billing;
pub mod proration;

pub use invoice_builder::InvoiceBuilder;
pub use monthly_billing::{
    BilledInvoice, BillingFailure, BillingSkip, MonthlyBillingOutcome, MonthlyBillingService,
};
pub use proration::{calculate_prorated_amount, Proration};
