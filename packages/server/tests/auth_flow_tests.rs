//! Integration tests for the account verification flow.
//!
//! Covers the full registration sequence (primary credential → phone code →
//! linking → session), the login confirmation variant, conflict handling,
//! and the code lifecycle (single active code, no replay, expiry semantics).

mod common;

use common::{fixtures, GraphQLClient, TestHarness};
use test_context::test_context;
use uuid::Uuid;

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

fn unique_phone() -> String {
    // +51 9xx xxx xxx style, unique per call
    let suffix: u64 = Uuid::new_v4().as_u128() as u64 % 100_000_000;
    format!("+519{:08}", suffix)
}

// ============================================================================
// Registration flow (end to end)
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_signup_flow_end_to_end(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());
    let email = unique_email("signup");
    let phone = unique_phone();

    // Step 1: primary credential
    let result = client
        .execute(&format!(
            r#"mutation {{ signUpWithEmail(email: "{}", password: "secret99", passwordConfirmation: "secret99") {{ identityId token isAdmin }} }}"#,
            email
        ))
        .await;
    assert!(result.is_ok(), "Sign-up should succeed: {:?}", result.errors);
    let identity_id = result.get("signUpWithEmail.identityId");
    let identity_id = identity_id.as_str().unwrap();
    assert!(!result.get("signUpWithEmail.token").as_str().unwrap().is_empty());

    // Step 2: request a phone code; the mock records the delivery
    let result = client
        .execute(&format!(
            r#"mutation {{ requestPhoneCode(phoneNumber: "{}") }}"#,
            phone
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    let code = client
        .sms
        .last_code_for(&phone)
        .expect("a code should have been delivered");
    assert_eq!(code.len(), 6);

    // Step 3: verify the code; no account holds this phone yet
    let result = client
        .execute(&format!(
            r#"mutation {{ verifyPhoneCode(phoneNumber: "{}", code: "{}") {{ verified matchedIdentityId error }} }}"#,
            phone, code
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("verifyPhoneCode.verified"), true);
    assert!(result.get("verifyPhoneCode.matchedIdentityId").is_null());

    // Step 4: link the verified phone to the new identity
    let authed = client.as_identity(Uuid::parse_str(identity_id).unwrap(), &email, false);
    let result = authed
        .execute(&format!(
            r#"mutation {{ linkPhoneToIdentity(phoneNumber: "{}") {{ success }} }}"#,
            phone
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("linkPhoneToIdentity.success"), true);

    // The profile now carries the phone
    let result = authed.execute("query { me { phoneNumber } }").await;
    assert_eq!(
        result.get("me.phoneNumber").as_str().unwrap(),
        phone.as_str()
    );
}

// ============================================================================
// Validation runs before any backend work
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_short_phone_rejected_without_delivery(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());

    let result = client
        .execute(r#"mutation { requestPhoneCode(phoneNumber: "+519876") }"#)
        .await;
    assert!(!result.is_ok(), "Short phone should be rejected");
    assert_eq!(client.sms.sent_count(), 0, "Nothing should be delivered");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_phone_without_country_code_rejected(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());

    let result = client
        .execute(r#"mutation { requestPhoneCode(phoneNumber: "9876543210") }"#)
        .await;
    assert!(!result.is_ok());
    assert_eq!(client.sms.sent_count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_malformed_code_rejected_before_lookup(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());
    let phone = unique_phone();

    for bad_code in ["12345", "1234567", "12a456", ""] {
        let result = client
            .execute(&format!(
                r#"mutation {{ verifyPhoneCode(phoneNumber: "{}", code: "{}") {{ verified }} }}"#,
                phone, bad_code
            ))
            .await;
        assert!(!result.is_ok(), "Code {:?} should be rejected", bad_code);
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_password_too_short_rejected_before_signup(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());
    let email = unique_email("shortpass");

    // "abc" matches its confirmation but is under the 6-char minimum
    let result = client
        .execute(&format!(
            r#"mutation {{ signUpWithEmail(email: "{}", password: "abc", passwordConfirmation: "abc") {{ identityId }} }}"#,
            email
        ))
        .await;
    assert!(!result.is_ok());

    // No identity was created: signing in with those credentials fails
    let result = client
        .execute(&format!(
            r#"mutation {{ signInWithEmail(email: "{}", password: "abc") {{ identityId }} }}"#,
            email
        ))
        .await;
    assert!(!result.is_ok());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_password_mismatch_rejected(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());

    let result = client
        .execute(&format!(
            r#"mutation {{ signUpWithEmail(email: "{}", password: "secret99", passwordConfirmation: "secret98") {{ identityId }} }}"#,
            unique_email("mismatch")
        ))
        .await;
    assert!(!result.is_ok());
    assert!(result.errors.iter().any(|e| e.contains("no coinciden")));
}

// ============================================================================
// Primary credential
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_duplicate_email_rejected(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());
    let email = unique_email("dup");

    fixtures::create_test_identity(&ctx.db_pool, &email, "password123")
        .await
        .unwrap();

    // Same email, different case
    let result = client
        .execute(&format!(
            r#"mutation {{ signUpWithEmail(email: "{}", password: "secret99", passwordConfirmation: "secret99") {{ identityId }} }}"#,
            email.to_uppercase()
        ))
        .await;
    assert!(!result.is_ok(), "Duplicate email should be rejected");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_sign_in_wrong_password(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());
    let email = unique_email("signin");

    fixtures::create_test_identity(&ctx.db_pool, &email, "password123")
        .await
        .unwrap();

    let result = client
        .execute(&format!(
            r#"mutation {{ signInWithEmail(email: "{}", password: "wrongpass") {{ identityId }} }}"#,
            email
        ))
        .await;
    assert!(!result.is_ok());

    let result = client
        .execute(&format!(
            r#"mutation {{ signInWithEmail(email: "{}", password: "password123") {{ identityId }} }}"#,
            email
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
}

// ============================================================================
// Code lifecycle
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_wrong_code_fails_then_correct_code_succeeds(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());
    let phone = unique_phone();

    client
        .execute(&format!(
            r#"mutation {{ requestPhoneCode(phoneNumber: "{}") }}"#,
            phone
        ))
        .await
        .unwrap();
    let code = client.sms.last_code_for(&phone).unwrap();

    // A wrong (but well-formed) code is a soft failure, not an exception
    let wrong = if code == "999999" { "999998" } else { "999999" };
    let result = client
        .execute(&format!(
            r#"mutation {{ verifyPhoneCode(phoneNumber: "{}", code: "{}") {{ verified error }} }}"#,
            phone, wrong
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("verifyPhoneCode.verified"), false);
    assert!(!result.get("verifyPhoneCode.error").is_null());

    // The real code still works afterwards
    let result = client
        .execute(&format!(
            r#"mutation {{ verifyPhoneCode(phoneNumber: "{}", code: "{}") {{ verified }} }}"#,
            phone, code
        ))
        .await;
    assert_eq!(result.get("verifyPhoneCode.verified"), true);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_used_code_cannot_be_replayed(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());
    let phone = unique_phone();

    client
        .execute(&format!(
            r#"mutation {{ requestPhoneCode(phoneNumber: "{}") }}"#,
            phone
        ))
        .await
        .unwrap();
    let code = client.sms.last_code_for(&phone).unwrap();

    let mutation = format!(
        r#"mutation {{ verifyPhoneCode(phoneNumber: "{}", code: "{}") {{ verified }} }}"#,
        phone, code
    );

    let result = client.execute(&mutation).await;
    assert_eq!(result.get("verifyPhoneCode.verified"), true);

    // Second submission of the same code must fail
    let result = client.execute(&mutation).await;
    assert_eq!(result.get("verifyPhoneCode.verified"), false);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_new_code_retires_previous_one(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());
    let phone = unique_phone();

    let request = format!(
        r#"mutation {{ requestPhoneCode(phoneNumber: "{}") }}"#,
        phone
    );

    client.execute(&request).await.unwrap();
    let first_code = client.sms.last_code_for(&phone).unwrap();

    client.execute(&request).await.unwrap();
    let second_code = client.sms.last_code_for(&phone).unwrap();
    assert_eq!(client.sms.sent_count(), 2);

    if first_code != second_code {
        // The retired code no longer validates
        let result = client
            .execute(&format!(
                r#"mutation {{ verifyPhoneCode(phoneNumber: "{}", code: "{}") {{ verified }} }}"#,
                phone, first_code
            ))
            .await;
        assert_eq!(result.get("verifyPhoneCode.verified"), false);
    }

    // The fresh one does
    let result = client
        .execute(&format!(
            r#"mutation {{ verifyPhoneCode(phoneNumber: "{}", code: "{}") {{ verified }} }}"#,
            phone, second_code
        ))
        .await;
    assert_eq!(result.get("verifyPhoneCode.verified"), true);
}

// ============================================================================
// Account linking
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_link_conflict_with_second_identity(ctx: &TestHarness) {
    let phone = unique_phone();
    let holder =
        fixtures::create_identity_with_phone(&ctx.db_pool, &unique_email("holder"), &phone)
            .await
            .unwrap();

    let other_email = unique_email("other");
    let other = fixtures::create_test_identity(&ctx.db_pool, &other_email, "password123")
        .await
        .unwrap();

    let client = GraphQLClient::with_auth_user(
        ctx.db_pool.clone(),
        *other.id.as_uuid(),
        &other_email,
        false,
    );

    // Verifying the phone reports the existing holder
    client
        .execute(&format!(
            r#"mutation {{ requestPhoneCode(phoneNumber: "{}") }}"#,
            phone
        ))
        .await
        .unwrap();
    let code = client.sms.last_code_for(&phone).unwrap();
    let result = client
        .execute(&format!(
            r#"mutation {{ verifyPhoneCode(phoneNumber: "{}", code: "{}") {{ verified matchedIdentityId }} }}"#,
            phone, code
        ))
        .await;
    assert_eq!(result.get("verifyPhoneCode.verified"), true);
    assert_eq!(
        result.get("verifyPhoneCode.matchedIdentityId").as_str(),
        Some(holder.id.to_string().as_str())
    );

    // Linking to a different identity fails closed
    let result = client
        .execute(&format!(
            r#"mutation {{ linkPhoneToIdentity(phoneNumber: "{}") {{ success message }} }}"#,
            phone
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("linkPhoneToIdentity.success"), false);
    assert!(!result.get("linkPhoneToIdentity.message").is_null());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_relink_same_pair_is_idempotent(ctx: &TestHarness) {
    let phone = unique_phone();
    let email = unique_email("relink");
    let identity = fixtures::create_identity_with_phone(&ctx.db_pool, &email, &phone)
        .await
        .unwrap();

    let client = GraphQLClient::with_auth_user(
        ctx.db_pool.clone(),
        *identity.id.as_uuid(),
        &email,
        false,
    );

    // Login variant: the phone already belongs to this identity; re-linking
    // is a confirmation, not a conflict.
    let result = client
        .execute(&format!(
            r#"mutation {{ linkPhoneToIdentity(phoneNumber: "{}") {{ success }} }}"#,
            phone
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("linkPhoneToIdentity.success"), true);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_link_requires_authentication(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());

    let result = client
        .execute(&format!(
            r#"mutation {{ linkPhoneToIdentity(phoneNumber: "{}") {{ success }} }}"#,
            unique_phone()
        ))
        .await;
    assert!(!result.is_ok());
    assert!(result
        .errors
        .iter()
        .any(|e| e.contains("Authentication required")));
}

// ============================================================================
// Orchestrated verify-and-link
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_complete_verification_links_free_phone(ctx: &TestHarness) {
    let email = unique_email("orch");
    let identity = fixtures::create_test_identity(&ctx.db_pool, &email, "password123")
        .await
        .unwrap();
    let phone = unique_phone();

    let client = GraphQLClient::with_auth_user(
        ctx.db_pool.clone(),
        *identity.id.as_uuid(),
        &email,
        false,
    );

    client
        .execute(&format!(
            r#"mutation {{ requestPhoneCode(phoneNumber: "{}") }}"#,
            phone
        ))
        .await
        .unwrap();
    let code = client.sms.last_code_for(&phone).unwrap();

    let result = client
        .execute(&format!(
            r#"mutation {{ completePhoneVerification(phoneNumber: "{}", code: "{}") {{ complete conflict }} }}"#,
            phone, code
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("completePhoneVerification.complete"), true);
    assert!(result.get("completePhoneVerification.conflict").is_null());

    // The linked phone shows on the profile
    let result = client.execute("query { me { phoneNumber } }").await;
    assert_eq!(
        result.get("me.phoneNumber").as_str(),
        Some(phone.as_str())
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_complete_verification_confirms_own_phone(ctx: &TestHarness) {
    // Login variant: both factors already belong to one identity
    let email = unique_email("orchlogin");
    let phone = unique_phone();
    let identity = fixtures::create_identity_with_phone(&ctx.db_pool, &email, &phone)
        .await
        .unwrap();

    let client = GraphQLClient::with_auth_user(
        ctx.db_pool.clone(),
        *identity.id.as_uuid(),
        &email,
        false,
    );

    client
        .execute(&format!(
            r#"mutation {{ requestPhoneCode(phoneNumber: "{}") }}"#,
            phone
        ))
        .await
        .unwrap();
    let code = client.sms.last_code_for(&phone).unwrap();

    let result = client
        .execute(&format!(
            r#"mutation {{ completePhoneVerification(phoneNumber: "{}", code: "{}") {{ complete conflict }} }}"#,
            phone, code
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("completePhoneVerification.complete"), true);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_complete_verification_conflict_on_foreign_phone(ctx: &TestHarness) {
    let phone = unique_phone();
    fixtures::create_identity_with_phone(&ctx.db_pool, &unique_email("orchholder"), &phone)
        .await
        .unwrap();

    let email = unique_email("orchother");
    let other = fixtures::create_test_identity(&ctx.db_pool, &email, "password123")
        .await
        .unwrap();
    let client = GraphQLClient::with_auth_user(
        ctx.db_pool.clone(),
        *other.id.as_uuid(),
        &email,
        false,
    );

    client
        .execute(&format!(
            r#"mutation {{ requestPhoneCode(phoneNumber: "{}") }}"#,
            phone
        ))
        .await
        .unwrap();
    let code = client.sms.last_code_for(&phone).unwrap();

    let result = client
        .execute(&format!(
            r#"mutation {{ completePhoneVerification(phoneNumber: "{}", code: "{}") {{ complete conflict }} }}"#,
            phone, code
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("completePhoneVerification.complete"), false);
    assert!(!result.get("completePhoneVerification.conflict").is_null());

    // Nothing advanced: the other identity still has no linked phone
    let result = client.execute("query { me { phoneNumber } }").await;
    assert!(result.get("me.phoneNumber").is_null());
}

// ============================================================================
// Password reset
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_password_reset_flow(ctx: &TestHarness) {
    let phone = unique_phone();
    let email = unique_email("reset");
    fixtures::create_identity_with_phone(&ctx.db_pool, &email, &phone)
        .await
        .unwrap();

    let client = GraphQLClient::new(ctx.db_pool.clone());

    let result = client
        .execute(&format!(
            r#"mutation {{ requestPasswordReset(email: "{}") }}"#,
            email
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    let code = client
        .sms
        .last_code_for(&phone)
        .expect("reset code should go to the linked phone");

    let result = client
        .execute(&format!(
            r#"mutation {{ resetPassword(email: "{}", code: "{}", newPassword: "brandnew1") }}"#,
            email, code
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);

    // Old password no longer works, new one does
    let result = client
        .execute(&format!(
            r#"mutation {{ signInWithEmail(email: "{}", password: "password123") {{ identityId }} }}"#,
            email
        ))
        .await;
    assert!(!result.is_ok());

    let result = client
        .execute(&format!(
            r#"mutation {{ signInWithEmail(email: "{}", password: "brandnew1") {{ identityId }} }}"#,
            email
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_password_reset_unknown_email_is_silent(ctx: &TestHarness) {
    let client = GraphQLClient::new(ctx.db_pool.clone());

    // Succeeds without delivering anything, so emails can't be probed
    let result = client
        .execute(&format!(
            r#"mutation {{ requestPasswordReset(email: "{}") }}"#,
            unique_email("ghost")
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(client.sms.sent_count(), 0);
}
