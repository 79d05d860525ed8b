pub mod attendance;
pub mod call_data;
pub mod client;
pub mod employee;
pub mod holiday;
pub mod leave_request;
pub mod payslip;

pub use client::ApiClient;
