pub mod allocation;
pub mod payment_service;

pub use allocation::{allocate_oldest_first, validate_allocations, AllocationPlan, OpenInvoice};
pub use payment_service::{MethodTotal, PaymentFilter, PaymentService, PaymentStats};
