pub mod calendar;
pub mod lifx;
