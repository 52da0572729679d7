//! Registration/login flow state machines.
//!
//! Pure, synchronous state: the async actions sequence the backend calls and
//! feed their outcomes into these machines. A failed transition returns an
//! error and leaves the state untouched, so a retry always resumes from
//! where the flow actually is.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::IdentityId;

/// Minimum accepted password length for the primary credential.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum accepted phone number length (E.164 with country code).
pub const MIN_PHONE_LEN: usize = 10;

/// Exact length of a verification code.
pub const CODE_LEN: usize = 6;

/// Errors surfaced by flow validation and transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Las contraseñas no coinciden")]
    PasswordMismatch,

    #[error("La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres")]
    PasswordTooShort,

    #[error("Introduce un número de teléfono válido con código de país")]
    InvalidPhone,

    #[error("Introduce un código válido de 6 dígitos")]
    InvalidCode,

    #[error("Este número de teléfono ya está asociado a otra cuenta")]
    PhoneConflict,

    #[error("Operación no válida en el estado actual: {0}")]
    InvalidState(&'static str),
}

// =============================================================================
// Input validation (runs before any database or network work)
// =============================================================================

/// Validate a phone number: E.164-ish, at least 10 characters, leading `+`.
pub fn validate_phone(phone: &str) -> Result<(), FlowError> {
    if phone.len() < MIN_PHONE_LEN || !phone.starts_with('+') {
        return Err(FlowError::InvalidPhone);
    }
    if !phone[1..].chars().all(|c| c.is_ascii_digit()) {
        return Err(FlowError::InvalidPhone);
    }
    Ok(())
}

/// Validate a verification code: exactly 6 ASCII digits.
pub fn validate_code(code: &str) -> Result<(), FlowError> {
    if code.len() != CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(FlowError::InvalidCode);
    }
    Ok(())
}

/// Validate a password and its confirmation.
pub fn validate_password(password: &str, confirmation: &str) -> Result<(), FlowError> {
    if password != confirmation {
        return Err(FlowError::PasswordMismatch);
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(FlowError::PasswordTooShort);
    }
    Ok(())
}

// =============================================================================
// Phone verification widget (two screens)
// =============================================================================

/// Two-step phone verification: enter the phone, then enter the delivered code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStep {
    EnterPhone,
    EnterCode { phone: String },
}

impl VerificationStep {
    pub fn new() -> Self {
        VerificationStep::EnterPhone
    }

    /// A code was requested for `phone`. Validates the phone first; on
    /// failure the step stays at `EnterPhone`.
    pub fn code_requested(&mut self, phone: &str) -> Result<(), FlowError> {
        validate_phone(phone)?;
        *self = VerificationStep::EnterCode {
            phone: phone.to_string(),
        };
        Ok(())
    }

    /// Return to phone entry. Allowed from either step; nothing is lost
    /// beyond the outstanding code attempt.
    pub fn change_phone(&mut self) {
        *self = VerificationStep::EnterPhone;
    }

    /// The phone a code was sent to, if we're on the code screen.
    pub fn phone(&self) -> Option<&str> {
        match self {
            VerificationStep::EnterPhone => None,
            VerificationStep::EnterCode { phone } => Some(phone),
        }
    }
}

impl Default for VerificationStep {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Registration/login orchestrator
// =============================================================================

/// Orchestrates the two-factor signup/login sequence:
/// collect primary credential, verify the phone factor, link, finalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignupFlow {
    /// Collecting the primary credential (email + password).
    Initial,
    /// Primary credential accepted; the phone widget is active.
    Verification { identity_id: IdentityId },
    /// Terminal: both factors belong to one identity, session finalized.
    Complete { identity_id: IdentityId },
}

impl SignupFlow {
    pub fn new() -> Self {
        SignupFlow::Initial
    }

    /// The primary credential was accepted and an identity exists.
    pub fn credentials_accepted(&mut self, identity_id: IdentityId) -> Result<(), FlowError> {
        match self {
            SignupFlow::Initial => {
                *self = SignupFlow::Verification { identity_id };
                Ok(())
            }
            _ => Err(FlowError::InvalidState(
                "credentials already submitted for this flow",
            )),
        }
    }

    /// The verified phone was linked (or confirmed already linked) to the
    /// flow's identity. `success = false` means the phone belongs to a
    /// different identity: the flow stays in `Verification` for a retry
    /// with another number.
    pub fn phone_linked(&mut self, success: bool) -> Result<(), FlowError> {
        match self {
            SignupFlow::Verification { identity_id } => {
                if success {
                    let identity_id = *identity_id;
                    *self = SignupFlow::Complete { identity_id };
                    Ok(())
                } else {
                    Err(FlowError::PhoneConflict)
                }
            }
            _ => Err(FlowError::InvalidState(
                "phone verification is not active for this flow",
            )),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SignupFlow::Complete { .. })
    }

    /// The identity tied to this flow, once credentials were accepted.
    pub fn identity_id(&self) -> Option<IdentityId> {
        match self {
            SignupFlow::Initial => None,
            SignupFlow::Verification { identity_id } | SignupFlow::Complete { identity_id } => {
                Some(*identity_id)
            }
        }
    }
}

impl Default for SignupFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_accepts_e164() {
        assert!(validate_phone("+51987654321").is_ok());
        assert!(validate_phone("+15555551234").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_short_numbers() {
        assert_eq!(validate_phone("+519876"), Err(FlowError::InvalidPhone));
        assert_eq!(validate_phone(""), Err(FlowError::InvalidPhone));
    }

    #[test]
    fn test_validate_phone_rejects_missing_country_code() {
        assert_eq!(validate_phone("9876543210"), Err(FlowError::InvalidPhone));
    }

    #[test]
    fn test_validate_phone_rejects_letters() {
        assert_eq!(validate_phone("+51abc54321"), Err(FlowError::InvalidPhone));
    }

    #[test]
    fn test_validate_code_requires_six_digits() {
        assert!(validate_code("123456").is_ok());
        assert_eq!(validate_code("12345"), Err(FlowError::InvalidCode));
        assert_eq!(validate_code("1234567"), Err(FlowError::InvalidCode));
        assert_eq!(validate_code("12a456"), Err(FlowError::InvalidCode));
        assert_eq!(validate_code(""), Err(FlowError::InvalidCode));
    }

    #[test]
    fn test_validate_password_mismatch() {
        assert_eq!(
            validate_password("secret1", "secret2"),
            Err(FlowError::PasswordMismatch)
        );
    }

    #[test]
    fn test_validate_password_too_short() {
        // Matching but under the minimum length still fails
        assert_eq!(
            validate_password("abc", "abc"),
            Err(FlowError::PasswordTooShort)
        );
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("secret", "secret").is_ok());
    }

    #[test]
    fn test_verification_step_happy_path() {
        let mut step = VerificationStep::new();
        assert_eq!(step, VerificationStep::EnterPhone);

        step.code_requested("+51987654321").unwrap();
        assert_eq!(step.phone(), Some("+51987654321"));
    }

    #[test]
    fn test_verification_step_invalid_phone_keeps_state() {
        let mut step = VerificationStep::new();
        assert!(step.code_requested("12345").is_err());
        assert_eq!(step, VerificationStep::EnterPhone);
    }

    #[test]
    fn test_verification_step_change_phone() {
        let mut step = VerificationStep::new();
        step.code_requested("+51987654321").unwrap();
        step.change_phone();
        assert_eq!(step, VerificationStep::EnterPhone);
        assert_eq!(step.phone(), None);
    }

    #[test]
    fn test_signup_flow_happy_path() {
        let mut flow = SignupFlow::new();
        let identity_id = IdentityId::new();

        flow.credentials_accepted(identity_id).unwrap();
        assert_eq!(flow.identity_id(), Some(identity_id));
        assert!(!flow.is_complete());

        // Phone verified with no prior account: linked, flow completes
        flow.phone_linked(true).unwrap();
        assert!(flow.is_complete());
        assert_eq!(flow.identity_id(), Some(identity_id));
    }

    #[test]
    fn test_signup_flow_conflict_stays_in_verification() {
        let mut flow = SignupFlow::new();
        let identity_id = IdentityId::new();
        flow.credentials_accepted(identity_id).unwrap();

        // Phone belongs to someone else: error, no transition
        assert_eq!(flow.phone_linked(false), Err(FlowError::PhoneConflict));
        assert_eq!(flow, SignupFlow::Verification { identity_id });

        // Retry with a different (free) number succeeds
        flow.phone_linked(true).unwrap();
        assert!(flow.is_complete());
    }

    #[test]
    fn test_signup_flow_rejects_out_of_order_transitions() {
        let mut flow = SignupFlow::new();
        assert!(matches!(
            flow.phone_linked(true),
            Err(FlowError::InvalidState(_))
        ));
        assert_eq!(flow, SignupFlow::Initial);

        let identity_id = IdentityId::new();
        flow.credentials_accepted(identity_id).unwrap();
        assert!(matches!(
            flow.credentials_accepted(IdentityId::new()),
            Err(FlowError::InvalidState(_))
        ));
        // The original identity survives the rejected transition
        assert_eq!(flow.identity_id(), Some(identity_id));
    }

    #[test]
    fn test_signup_flow_complete_is_terminal() {
        let mut flow = SignupFlow::new();
        flow.credentials_accepted(IdentityId::new()).unwrap();
        flow.phone_linked(true).unwrap();

        assert!(matches!(
            flow.phone_linked(true),
            Err(FlowError::InvalidState(_))
        ));
        assert!(flow.is_complete());
    }
}
