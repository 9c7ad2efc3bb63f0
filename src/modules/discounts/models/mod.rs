mod discount;

pub use discount::{
    ApplyDiscountRequest, BulkDiscountRequest, Discount, DiscountStatus,
};
