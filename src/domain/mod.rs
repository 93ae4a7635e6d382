pub mod appointment;
pub mod audit;
pub mod budget;
pub mod client;
pub mod invoice;
pub mod payment;
pub mod types;
pub mod user;
