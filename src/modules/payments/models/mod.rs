mod payment;

pub use payment::{CreatePaymentRequest, Payment, PaymentAllocation, PaymentMethod};
