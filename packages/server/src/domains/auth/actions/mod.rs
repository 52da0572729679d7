pub mod link_phone;
pub mod password_reset;
pub mod register;
pub mod send_code;
pub mod sign_in;
pub mod sign_up;
pub mod verify_code;

pub use link_phone::{link_phone_to_identity, LinkOutcome};
pub use password_reset::{request_password_reset, reset_password};
pub use register::{complete_phone_verification, CompleteVerificationResult};
pub use send_code::request_phone_code;
pub use sign_in::sign_in_with_email;
pub use sign_up::sign_up_with_email;
pub use verify_code::{verify_phone_code, VerifyCodeResult};
