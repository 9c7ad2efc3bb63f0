pub mod invoice_service;

pub use invoice_service::{InvoiceFilter, InvoiceService, InvoiceStats, StatusBucket};
