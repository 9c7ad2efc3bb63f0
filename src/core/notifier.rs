use rust_decimal::Decimal;

/// Events that would be pushed to students or staff
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    BookingApproved {
        booking_id: String,
        student_id: String,
        room_number: String,
    },
    BookingRejected {
        booking_id: String,
        reason: String,
    },
    InvoiceGenerated {
        student_id: String,
        invoice_id: String,
        total: Decimal,
    },
    PaymentReceived {
        student_id: String,
        payment_id: String,
        amount: Decimal,
    },
}

/// Delivery channel for notifications (push, SMS, email)
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log instead of delivering them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::BookingApproved {
                booking_id,
                student_id,
                room_number,
            } => tracing::info!(
                target: "notifications",
                booking_id = %booking_id,
                student_id = %student_id,
                room_number = %room_number,
                "Booking approved"
            ),
            Notification::BookingRejected { booking_id, reason } => tracing::info!(
                target: "notifications",
                booking_id = %booking_id,
                reason = %reason,
                "Booking rejected"
            ),
            Notification::InvoiceGenerated {
                student_id,
                invoice_id,
                total,
            } => tracing::info!(
                target: "notifications",
                student_id = %student_id,
                invoice_id = %invoice_id,
                total = %total,
                "Invoice generated"
            ),
            Notification::PaymentReceived {
                student_id,
                payment_id,
                amount,
            } => tracing::info!(
                target: "notifications",
                student_id = %student_id,
                payment_id = %payment_id,
                amount = %amount,
                "Payment received"
            ),
        }
    }
}
