pub mod ip;

pub use ip::{FALLBACK_CLIENT_IP, extract_client_ip};
