mod invoice;
mod line_item;

pub use invoice::{Invoice, InvoiceKind, InvoiceStatus};
pub use line_item::LineItem;
