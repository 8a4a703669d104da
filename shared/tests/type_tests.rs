/// Integration-level tests for the `shared` crate.
///
/// Each section tests one module; unit tests that are tightly coupled to
/// private helpers live inside the modules themselves (see `#[cfg(test)]`
/// blocks in `role.rs`, `password.rs` and `config.rs`).
// ---------------------------------------------------------------------------
// Credential claims
// ---------------------------------------------------------------------------
#[cfg(test)]
mod claims_tests {
    use shared::types::*;

    fn sample_claims() -> CredentialClaims {
        CredentialClaims {
            sub: "42".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice A".to_string(),
            role: Role::Advertiser,
            iat: 1_700_000_000,
            exp: 9_999_999_999,
        }
    }

    #[test]
    fn claims_json_contains_expected_keys() {
        let json = serde_json::to_value(sample_claims()).unwrap();
        for key in &["sub", "email", "name", "role", "iat", "exp"] {
            assert!(json.get(key).is_some(), "missing key: {}", key);
        }
        assert_eq!(json["role"], "advertiser");
    }

    #[test]
    fn unrecognised_role_deserializes_as_unknown() {
        let json = r#"{"sub":"1","email":"a@b.c","name":"n","role":"superuser","iat":0,"exp":1}"#;
        let c: CredentialClaims = serde_json::from_str(json).unwrap();
        assert_eq!(c.role, Role::Unknown);
    }

    #[test]
    fn claims_missing_a_field_do_not_deserialize() {
        let json = r#"{"sub":"1","email":"a@b.c","role":"viewer","iat":0,"exp":1}"#;
        assert!(serde_json::from_str::<CredentialClaims>(json).is_err());
    }

    #[test]
    fn user_id_requires_a_numeric_subject() {
        let mut c = sample_claims();
        assert_eq!(c.user_id(), Some(42));
        c.sub = "alice".into();
        assert_eq!(c.user_id(), None);
    }
}

// ---------------------------------------------------------------------------
// Login types
// ---------------------------------------------------------------------------

#[cfg(test)]
mod login_tests {
    use shared::types::*;

    fn login(email: &str, password: &str) -> LoginData {
        LoginData {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn login_data_username_alias_maps_to_email() {
        let json = r#"{"username":"bob@example.com","password":"pass123"}"#;
        let d: LoginData = serde_json::from_str(json).unwrap();
        assert_eq!(d.email, "bob@example.com");
    }

    #[test]
    fn all_login_error_codes_unique() {
        let codes = [
            LoginError::InvalidCredentials.to_code(),
            LoginError::InvalidEmail.to_code(),
            LoginError::MissingField("x".into()).to_code(),
            LoginError::InternalError.to_code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "duplicate login error codes");
    }

    #[test]
    fn login_error_response_is_serializable() {
        let json = serde_json::to_value(LoginError::InvalidCredentials.to_response()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "INVALID_CREDENTIALS");
        assert_eq!(json["message"], "Invalid email or password");
    }

    #[test]
    fn login_response_success_parses_back() {
        let r = LoginResponse::success(AuthGrant {
            user: UserProfile {
                id: 1,
                email: "a@b.co".into(),
                name: "A".into(),
                role: Role::Viewer,
            },
            token: "t.o.k".into(),
            expires_in: 3600,
        });
        let json = serde_json::to_string(&r).unwrap();
        match serde_json::from_str::<LoginResponse>(&json).unwrap() {
            LoginResponse::Success {
                user, expires_in, ..
            } => {
                assert_eq!(user.role, Role::Viewer);
                assert_eq!(expires_in, 3600);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn email_validation_matches_the_signup_form() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("  padded@example.org "));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@example"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn validate_login_reports_the_first_problem() {
        assert_eq!(
            validate_login(&login("", "x")),
            Err(LoginError::MissingField("email".into()))
        );
        assert_eq!(
            validate_login(&login("nope", "x")),
            Err(LoginError::InvalidEmail)
        );
        assert_eq!(
            validate_login(&login("a@b.co", "")),
            Err(LoginError::MissingField("password".into()))
        );
        assert_eq!(validate_login(&login("a@b.co", "x")), Ok(()));
    }
}

// ---------------------------------------------------------------------------
// Register types
// ---------------------------------------------------------------------------

#[cfg(test)]
mod register_tests {
    use shared::types::*;

    fn form() -> RegistrationData {
        RegistrationData {
            email: "new@example.com".into(),
            password: "secret1".into(),
            confirm_password: Some("secret1".into()),
            first_name: "New".into(),
            last_name: "Person".into(),
            role: Role::Viewer,
            company_name: None,
        }
    }

    #[test]
    fn register_data_accepts_camel_case_fields() {
        let json = r#"{
            "email": "bob@example.com",
            "password": "Pass1234",
            "confirmPassword": "Pass1234",
            "firstName": "Bob",
            "lastName": "Builder",
            "role": "advertiser",
            "companyName": "Bob Co"
        }"#;
        let d: RegistrationData = serde_json::from_str(json).unwrap();
        assert_eq!(d.first_name, "Bob");
        assert_eq!(d.role, Role::Advertiser);
        assert_eq!(d.company_name.as_deref(), Some("Bob Co"));
        assert_eq!(d.display_name(), "Bob Builder");
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(validate_registration(&form()), Ok(()));
    }

    #[test]
    fn short_password_is_rejected() {
        let mut f = form();
        f.password = "12345".into();
        f.confirm_password = Some("12345".into());
        assert_eq!(
            validate_registration(&f),
            Err(RegistrationError::InvalidPassword)
        );
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let mut f = form();
        f.confirm_password = Some("secret2".into());
        assert_eq!(
            validate_registration(&f),
            Err(RegistrationError::PasswordMismatch)
        );
    }

    #[test]
    fn missing_names_are_reported_by_field() {
        let mut f = form();
        f.last_name = "  ".into();
        let err = validate_registration(&f).unwrap_err();
        assert_eq!(err, RegistrationError::MissingField("last_name".into()));
        assert!(err.to_message().contains("last_name"));
    }

    #[test]
    fn advertisers_need_a_company() {
        let mut f = form();
        f.role = Role::Advertiser;
        assert_eq!(
            validate_registration(&f),
            Err(RegistrationError::CompanyRequired)
        );
        f.company_name = Some("Acme".into());
        assert_eq!(validate_registration(&f), Ok(()));
    }

    #[test]
    fn unknown_role_cannot_register() {
        let mut f = form();
        f.role = Role::Unknown;
        assert_eq!(
            validate_registration(&f),
            Err(RegistrationError::InvalidRole)
        );
    }

    #[test]
    fn register_error_response_serializes_correctly() {
        let json = serde_json::to_value(RegistrationError::EmailTaken.to_response()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "EMAIL_TAKEN");
    }
}

// ---------------------------------------------------------------------------
// Credential codec
// ---------------------------------------------------------------------------

#[cfg(test)]
mod codec_tests {
    use std::time::Duration;

    use jsonwebtoken::get_current_timestamp;
    use shared::types::*;
    use shared::{CredentialCodec, DecodeError};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn codec() -> CredentialCodec {
        CredentialCodec::new(SECRET, Duration::from_secs(3600), true)
    }

    fn claims(exp: u64) -> CredentialClaims {
        CredentialClaims {
            sub: "7".into(),
            email: "eve@example.com".into(),
            name: "Eve".into(),
            role: Role::Administrator,
            iat: 0,
            exp,
        }
    }

    #[test]
    fn issued_credential_decodes_to_matching_identity() {
        let codec = codec();
        let token = codec
            .issue(3, "viewer@example.com", "Viewer User", Role::Viewer)
            .unwrap();
        let id = codec.decode(&token).unwrap();
        assert_eq!(id.user_id(), 3);
        assert_eq!(id.email(), "viewer@example.com");
        assert_eq!(id.name(), "Viewer User");
        assert_eq!(id.role(), Role::Viewer);
        assert_eq!(id.token(), token);
    }

    #[test]
    fn huge_ttl_issues_without_overflow() {
        let auth = AuthConfig {
            token_expiry_minutes: u64::MAX,
            enforce_expiry: true,
            jwt_secret: Some(SECRET.to_string()),
        };
        let codec = CredentialCodec::from_config(&auth).unwrap();
        let token = codec.issue(1, "a@b.co", "A", Role::Viewer).unwrap();
        assert_eq!(codec.decode(&token).unwrap().user_id(), 1);
    }

    #[test]
    fn empty_input_is_missing() {
        assert_eq!(codec().decode("   "), Err(DecodeError::Missing));
    }

    #[test]
    fn garbage_is_malformed() {
        for raw in ["mock-jwt-token", "a.b.c", "{\"role\":\"admin\"}"] {
            assert!(
                matches!(codec().decode(raw), Err(DecodeError::Malformed(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn foreign_signature_is_malformed() {
        let other = CredentialCodec::new(
            "ffffffffffffffffffffffffffffffff",
            Duration::from_secs(60),
            true,
        );
        let token = other.issue(1, "a@b.co", "A", Role::Viewer).unwrap();
        assert!(matches!(
            codec().decode(&token),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn expired_credential_is_rejected_when_enforced() {
        let token = codec()
            .sign(&claims(get_current_timestamp() - 120))
            .unwrap();
        assert_eq!(codec().decode(&token), Err(DecodeError::Expired));
    }

    #[test]
    fn expired_credential_is_accepted_when_not_enforced() {
        let lenient = CredentialCodec::new(SECRET, Duration::from_secs(60), false);
        let token = lenient
            .sign(&claims(get_current_timestamp() - 120))
            .unwrap();
        assert_eq!(lenient.decode(&token).unwrap().user_id(), 7);
    }

    #[test]
    fn non_numeric_subject_yields_no_identity() {
        let mut c = claims(get_current_timestamp() + 600);
        c.sub = "seven".into();
        let token = codec().sign(&c).unwrap();
        assert!(matches!(
            codec().decode(&token),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_role_survives_decoding_as_unknown() {
        let mut c = claims(get_current_timestamp() + 600);
        c.role = Role::Unknown;
        let token = codec().sign(&c).unwrap();
        assert_eq!(codec().decode(&token).unwrap().role(), Role::Unknown);
    }

    #[test]
    fn formatting_never_includes_the_token() {
        let token = codec().issue(9, "x@y.zz", "X", Role::Viewer).unwrap();
        let id = codec().decode(&token).unwrap();
        for shown in [format!("{}", id), format!("{:?}", id)] {
            assert!(shown.contains("x@y.zz"));
            assert!(!shown.contains(&token));
        }
    }
}

// ---------------------------------------------------------------------------
// User directory
// ---------------------------------------------------------------------------

#[cfg(test)]
mod directory_tests {
    use std::time::Duration;

    use shared::types::*;
    use shared::{CredentialCodec, UserDirectory};

    async fn directory() -> UserDirectory {
        let codec = CredentialCodec::new(
            "0123456789abcdef0123456789abcdef",
            Duration::from_secs(900),
            true,
        );
        UserDirectory::with_demo_accounts(codec).await.unwrap()
    }

    fn login(email: &str, password: &str) -> LoginData {
        LoginData {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn demo_accounts_are_seeded() {
        let dir = directory().await;
        assert_eq!(dir.len().await, 3);
    }

    #[tokio::test]
    async fn admin_demo_login_issues_admin_credential() {
        let dir = directory().await;
        let grant = dir
            .authenticate(&login("admin@example.com", "admin123"))
            .await
            .unwrap();
        assert_eq!(grant.user.role, Role::Administrator);
        assert_eq!(grant.expires_in, 900);

        let id = dir.codec().decode(&grant.token).unwrap();
        assert_eq!(id.role(), Role::Administrator);
        assert_eq!(id.user_id(), grant.user.id);
    }

    #[tokio::test]
    async fn email_match_ignores_case() {
        let dir = directory().await;
        assert!(
            dir.authenticate(&login("Viewer@Example.com", "viewer123"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let dir = directory().await;
        let bad_pw = dir
            .authenticate(&login("admin@example.com", "nope"))
            .await
            .unwrap_err();
        let no_user = dir
            .authenticate(&login("ghost@example.com", "admin123"))
            .await
            .unwrap_err();
        assert_eq!(bad_pw, LoginError::InvalidCredentials);
        assert_eq!(no_user, LoginError::InvalidCredentials);
    }

    #[tokio::test]
    async fn registered_account_can_log_in() {
        let dir = directory().await;
        let profile = dir
            .register(&RegistrationData {
                email: "shop@example.com".into(),
                password: "shop123".into(),
                confirm_password: None,
                first_name: "Shop".into(),
                last_name: "Owner".into(),
                role: Role::Advertiser,
                company_name: Some("Shop Ltd".into()),
            })
            .await
            .unwrap();
        assert_eq!(profile.id, 4);
        assert_eq!(profile.name, "Shop Owner");

        let grant = dir
            .authenticate(&login("shop@example.com", "shop123"))
            .await
            .unwrap();
        assert_eq!(grant.user, profile);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let dir = directory().await;
        let err = dir
            .register(&RegistrationData {
                email: "ADMIN@example.com".into(),
                password: "another1".into(),
                confirm_password: None,
                first_name: "Second".into(),
                last_name: "Admin".into(),
                role: Role::Administrator,
                company_name: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err, RegistrationError::EmailTaken);
        assert_eq!(dir.len().await, 3);
    }
}
