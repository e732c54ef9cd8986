mod cancellation;
mod core;
mod types;


pub use cancellation::CancellationToken;
pub use self::core::Supervisor;
pub use types::*;
