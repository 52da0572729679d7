// Kernel: dependency container and external service abstractions

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, TwilioAdapter};
pub use traits::BaseSmsService;
