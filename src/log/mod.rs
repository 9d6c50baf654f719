pub mod middleware;
pub mod request;

pub use middleware::RequestExtension;
