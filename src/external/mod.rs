pub mod optimizer_http;
pub mod optimizer_provider;
