pub mod clock;
pub mod error;
pub mod local_client;
pub mod service;
pub mod soft;

#[cfg(test)]
mod service_test;
