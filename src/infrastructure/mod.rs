pub mod charting;
pub mod http;
pub mod services;
