mod extractors;
pub mod jwt;

pub use extractors::*;
pub use jwt::{create_access_token, decode_access_token, Claims};
