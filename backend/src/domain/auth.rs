//! Authentication primitives: credentials, registration input, and sessions.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::{EmailAddress, NameField, PersonName, PhoneNumber, User, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or not shaped like an address.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised the same way as at registration.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use tenancy::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada@Example.com", "pw").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email).map_err(|_| LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failure for a registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    Profile(UserValidationError),
    EmptyPassword,
    EmailTaken,
}

impl RegistrationValidationError {
    /// Payload key of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Profile(inner) => inner.field(),
            Self::EmptyPassword => "password",
            Self::EmailTaken => "email",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmailTaken => write!(f, "email is already registered"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Profile(value)
    }
}

/// Raw registration payload fields, borrowed from the request.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationForm<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub phone: Option<&'a str>,
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    first_name: PersonName,
    last_name: PersonName,
    email: EmailAddress,
    password: Zeroizing<String>,
    phone: Option<PhoneNumber>,
}

impl Registration {
    /// Validate a form, reporting the first invalid field in the order
    /// firstName, lastName, email, password, phone.
    pub fn try_from_form(form: RegistrationForm<'_>) -> Result<Self, RegistrationValidationError> {
        let first_name = PersonName::new(NameField::First, form.first_name)?;
        let last_name = PersonName::new(NameField::Last, form.last_name)?;
        let email = EmailAddress::new(form.email)?;
        if form.password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        let phone = form.phone.map(PhoneNumber::new).transpose()?.flatten();
        Ok(Self {
            first_name,
            last_name,
            email,
            password: Zeroizing::new(form.password.to_owned()),
            phone,
        })
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }
}

/// PHC-formatted password hash. Never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Signed bearer token.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Token and profile returned by registration and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    #[schema(value_type = String, example = "eyJhbGciOiJIUzI1NiJ9...")]
    access_token: AccessToken,
    user: User,
}

impl AuthSession {
    pub fn new(access_token: AccessToken, user: User) -> Self {
        Self { access_token, user }
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    fn base_form() -> RegistrationForm<'static> {
        RegistrationForm {
            first_name: "Ada",
            last_name: "Lovelace",
            email: "ada@example.com",
            password: "engine",
            phone: None,
        }
    }

    #[fixture]
    fn form() -> RegistrationForm<'static> {
        base_form()
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::InvalidEmail)]
    #[case("not-an-email", "pw", LoginValidationError::InvalidEmail)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn credentials_keep_password_whitespace() {
        let creds = LoginCredentials::try_from_parts(" ada@example.com ", " secret ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.email().as_ref(), "ada@example.com");
        assert_eq!(creds.password(), " secret ");
    }

    #[rstest]
    fn registration_accepts_valid_form(form: RegistrationForm<'static>) {
        let registration = Registration::try_from_form(RegistrationForm {
            phone: Some("0700"),
            ..form
        })
        .expect("valid form");
        assert_eq!(registration.first_name().as_ref(), "Ada");
        assert_eq!(registration.password(), "engine");
        assert_eq!(registration.phone().map(AsRef::as_ref), Some("0700"));
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn registration_treats_blank_phone_as_absent(
        form: RegistrationForm<'static>,
        #[case] phone: &'static str,
    ) {
        let registration = Registration::try_from_form(RegistrationForm {
            phone: Some(phone),
            ..form
        })
        .expect("blank phone is accepted");
        assert!(registration.phone().is_none());
    }

    #[rstest]
    fn registration_reports_first_invalid_field(form: RegistrationForm<'static>) {
        let err = Registration::try_from_form(RegistrationForm {
            last_name: "",
            email: "",
            password: "",
            ..form
        })
        .expect_err("several fields are invalid");
        assert_eq!(err.field(), "lastName");
    }

    #[rstest]
    #[case(RegistrationForm { first_name: " ", ..base_form() }, "firstName")]
    #[case(RegistrationForm { email: "nope", ..base_form() }, "email")]
    #[case(RegistrationForm { password: "", ..base_form() }, "password")]
    #[case(RegistrationForm { phone: Some("1234567890123456"), ..base_form() }, "phone")]
    fn registration_names_failing_field(
        #[case] input: RegistrationForm<'static>,
        #[case] field: &str,
    ) {
        let err = Registration::try_from_form(input).expect_err("invalid form");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn secrets_are_redacted_in_debug_output() {
        let hash = PasswordHash::new("$argon2id$v=19$secret");
        let token = AccessToken::new("eyJ.secret");
        assert!(!format!("{hash:?}").contains("secret"));
        assert!(!format!("{token:?}").contains("secret"));
    }
}
