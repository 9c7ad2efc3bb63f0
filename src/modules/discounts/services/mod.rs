pub mod discount_service;

pub use discount_service::{
    BulkDiscountFailure, BulkDiscountOutcome, DiscountFilter, DiscountService,
};
