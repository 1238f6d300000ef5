pub mod api;
pub mod logging;

pub use api::GatewayTransport;
pub use logging::Logger;
