pub mod bookings;
pub mod pricing;
pub mod qr;

pub use bookings::BookingService;
pub use qr::{CodeRenderer, QrSvgRenderer};
