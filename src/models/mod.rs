pub mod appointment;
pub mod audit;
pub mod budget;
pub mod client;
#[cfg(feature = "server")]
pub mod config;
pub mod invoice;
pub mod payment;
pub mod user;
