pub mod extractors;
pub mod password;
pub mod policy;
pub mod services;

pub use extractors::AuthUser;
