pub mod use_expenses;
pub mod use_request;

pub use use_expenses::use_expenses;
pub use use_request::use_request;
