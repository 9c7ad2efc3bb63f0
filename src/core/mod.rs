pub mod clock;
pub mod error;
pub mod locks;
pub mod money;
pub mod notifier;
pub mod pagination;
pub mod response;
pub mod traits;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AppError, FieldErrors, Result};
pub use locks::KeyedLocks;
pub use notifier::{LogNotifier, Notification, Notifier};
pub use pagination::{Page, PageRequest, Pagination};
pub use traits::{Record, Repository};
