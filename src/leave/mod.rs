//! Leave duration, policy checks and the leave request form.

pub mod balance;
pub mod duration;
pub mod form;

pub use balance::LeaveBalance;
pub use duration::{calculate_days, calculate_working_days};
pub use form::{LeaveField, LeaveForm, ValidationErrors};
