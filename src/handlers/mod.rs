pub mod get;
pub mod put;

pub use get::get_handler;
pub use put::put_handler;
