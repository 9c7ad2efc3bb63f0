// Composition root: builds every service over one set of repositories and
// registers them with actix

use std::sync::Arc;

use actix_web::web;

use crate::config::BillingConfig;
use crate::core::{Clock, KeyedLocks, Notifier};
use crate::middleware::{json_error_handler, path_error_handler, query_error_handler};
use crate::modules::analytics::AnalyticsService;
use crate::modules::billing::MonthlyBillingService;
use crate::modules::booking_requests::{BookingRepository, BookingService};
use crate::modules::discounts::{DiscountRepository, DiscountService};
use crate::modules::invoices::{InvoiceRepository, InvoiceService};
use crate::modules::ledgers::{LedgerRepository, LedgerService};
use crate::modules::payments::{PaymentRepository, PaymentService};
use crate::modules::reports::{ReportRepository, ReportService};
use crate::modules::rooms::{RoomRepository, RoomService};
use crate::modules::students::{StudentRepository, StudentService};
use crate::modules::{
    analytics, booking_requests, discounts, health, invoices, ledgers, payments, reports, rooms,
    students,
};
use crate::storage::{Repositories, StorageBackend};

/// Every service of the back office, shared across workers
#[derive(Clone)]
pub struct AppServices {
    pub backend: StorageBackend,
    pub rooms: Arc<RoomService>,
    pub ledger: Arc<LedgerService>,
    pub invoices: Arc<InvoiceService>,
    pub monthly_billing: Arc<MonthlyBillingService>,
    pub students: Arc<StudentService>,
    pub bookings: Arc<BookingService>,
    pub payments: Arc<PaymentService>,
    pub discounts: Arc<DiscountService>,
    pub reports: Arc<ReportService>,
    pub analytics: Arc<AnalyticsService>,
}

impl AppServices {
    pub fn new(
        repositories: Repositories,
        billing: BillingConfig,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let student_repo = StudentRepository::new(repositories.students);
        let invoice_repo = InvoiceRepository::new(repositories.invoices);
        let ledger_repo = LedgerRepository::new(repositories.ledgers);
        let payment_repo = PaymentRepository::new(repositories.payments);
        // Invoice issuing, payments and discounts all write a student's ledger and
        // invoices, so they serialize on one per-student registry
        let student_locks = Arc::new(KeyedLocks::new());

        let rooms = Arc::new(RoomService::new(
            RoomRepository::new(repositories.rooms),
            clock.clone(),
        ));
        let ledger = Arc::new(LedgerService::new(
            ledger_repo.clone(),
            student_repo.clone(),
            clock.clone(),
        ));
        let invoices = Arc::new(InvoiceService::new(
            invoice_repo.clone(),
            student_repo.clone(),
            ledger.clone(),
            billing,
            student_locks.clone(),
            clock.clone(),
            notifier.clone(),
        ));
        let monthly_billing = Arc::new(MonthlyBillingService::new(
            student_repo.clone(),
            invoice_repo.clone(),
            invoices.clone(),
        ));
        let students = Arc::new(StudentService::new(
            student_repo.clone(),
            invoice_repo.clone(),
            rooms.clone(),
            invoices.clone(),
            ledger.clone(),
            clock.clone(),
        ));
        let bookings = Arc::new(BookingService::new(
            BookingRepository::new(repositories.bookings),
            students.clone(),
            clock.clone(),
            notifier.clone(),
        ));
        let payments = Arc::new(PaymentService::new(
            payment_repo.clone(),
            invoice_repo.clone(),
            student_repo.clone(),
            ledger.clone(),
            student_locks.clone(),
            clock.clone(),
            notifier,
        ));
        let discounts = Arc::new(DiscountService::new(
            DiscountRepository::new(repositories.discounts),
            student_repo.clone(),
            invoice_repo.clone(),
            ledger.clone(),
            student_locks,
            clock.clone(),
        ));
        let reports = Arc::new(ReportService::new(
            ReportRepository::new(repositories.reports),
            ledger_repo,
            payment_repo.clone(),
            invoice_repo.clone(),
            clock.clone(),
        ));
        let analytics = Arc::new(AnalyticsService::new(
            student_repo,
            invoice_repo,
            payment_repo,
            rooms.clone(),
            clock,
        ));

        Self {
            backend: repositories.backend,
            rooms,
            ledger,
            invoices,
            monthly_billing,
            students,
            bookings,
            payments,
            discounts,
            reports,
            analytics,
        }
    }

    /// Registers shared state, extractor error handlers and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.backend.clone()))
            .app_data(web::Data::new(self.rooms.clone()))
            .app_data(web::Data::new(self.ledger.clone()))
            .app_data(web::Data::new(self.invoices.clone()))
            .app_data(web::Data::new(self.monthly_billing.clone()))
            .app_data(web::Data::new(self.students.clone()))
            .app_data(web::Data::new(self.bookings.clone()))
            .app_data(web::Data::new(self.payments.clone()))
            .app_data(web::Data::new(self.discounts.clone()))
            .app_data(web::Data::new(self.reports.clone()))
            .app_data(web::Data::new(self.analytics.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler));

        health::configure(cfg);
        cfg.service(
            web::scope("/api/v1")
                .configure(booking_requests::controllers::configure)
                .configure(students::controllers::configure)
                .configure(rooms::controllers::configure)
                .configure(invoices::controllers::configure)
                .configure(payments::controllers::configure)
                .configure(discounts::controllers::configure)
                .configure(ledgers::controllers::configure)
                .configure(reports::controllers::configure)
                .configure(analytics::controllers::configure),
        );
    }
}
