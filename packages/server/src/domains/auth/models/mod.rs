pub mod identity;
pub mod verification_code;

pub use identity::{hash_password, is_admin_email, verify_password, Identity};
pub use verification_code::{
    generate_code, hash_identifier, CodeCheck, VerificationCode, CODE_TTL_MINUTES,
};
