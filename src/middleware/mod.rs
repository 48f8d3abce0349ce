pub mod security;

pub use security::{cors_layer, with_security_headers};
