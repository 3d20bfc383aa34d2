pub mod printing;
pub mod results;
pub mod vouchers;
