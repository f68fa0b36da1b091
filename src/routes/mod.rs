mod error_handlers;
mod health_check;
mod landing;
mod subscribe;

pub use error_handlers::error_chain_fmt;
pub use health_check::health_check;
pub use landing::{landing_page, SignupStatus};
pub use subscribe::{form_response, script_response, subscribe};
