pub mod appointment;
pub mod budget;
pub mod client;
pub mod invoice;
pub mod payment;
pub mod user;
