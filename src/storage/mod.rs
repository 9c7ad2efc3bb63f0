// Storage backends behind the `Repository` trait

pub mod memory;
pub mod mysql;

use std::sync::Arc;

use sqlx::MySqlPool;

use crate::core::{Repository, Result};
use crate::modules::booking_requests::models::BookingRequest;
use crate::modules::discounts::models::Discount;
use crate::modules::invoices::models::Invoice;
use crate::modules::ledgers::models::StudentLedger;
use crate::modules::payments::models::Payment;
use crate::modules::reports::models::Report;
use crate::modules::rooms::models::Room;
use crate::modules::students::models::Student;

use self::memory::MemoryRepository;
use self::mysql::MySqlRepository;

/// Which store the repositories talk to; used by the readiness probe
#[derive(Clone)]
pub enum StorageBackend {
    Memory,
    MySql(MySqlPool),
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::MySql(_) => "mysql",
        }
    }

    pub async fn ping(&self) -> Result<()> {
        match self {
            StorageBackend::Memory => Ok(()),
            StorageBackend::MySql(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
        }
    }
}

/// One repository per aggregate, all on the same backend
#[derive(Clone)]
pub struct Repositories {
    pub backend: StorageBackend,
    pub students: Arc<dyn Repository<Student>>,
    pub bookings: Arc<dyn Repository<BookingRequest>>,
    pub rooms: Arc<dyn Repository<Room>>,
    pub invoices: Arc<dyn Repository<Invoice>>,
    pub payments: Arc<dyn Repository<Payment>>,
    pub discounts: Arc<dyn Repository<Discount>>,
    pub ledgers: Arc<dyn Repository<StudentLedger>>,
    pub reports: Arc<dyn Repository<Report>>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            students: Arc::new(MemoryRepository::new()),
            bookings: Arc::new(MemoryRepository::new()),
            rooms: Arc::new(MemoryRepository::new()),
            invoices: Arc::new(MemoryRepository::new()),
            payments: Arc::new(MemoryRepository::new()),
            discounts: Arc::new(MemoryRepository::new()),
            ledgers: Arc::new(MemoryRepository::new()),
            reports: Arc::new(MemoryRepository::new()),
        }
    }

    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            students: Arc::new(MySqlRepository::new(pool.clone())),
            bookings: Arc::new(MySqlRepository::new(pool.clone())),
            rooms: Arc::new(MySqlRepository::new(pool.clone())),
            invoices: Arc::new(MySqlRepository::new(pool.clone())),
            payments: Arc::new(MySqlRepository::new(pool.clone())),
            discounts: Arc::new(MySqlRepository::new(pool.clone())),
            ledgers: Arc::new(MySqlRepository::new(pool.clone())),
            reports: Arc::new(MySqlRepository::new(pool.clone())),
            backend: StorageBackend::MySql(pool),
        }
    }
}
