//! User data model.
//!
//! Every user-facing field is a validated newtype so handlers and adapters
//! cannot build a [`User`] that violates the column constraints.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length of a first or last name, in characters.
pub const PERSON_NAME_MAX: usize = 15;
/// Maximum length of a phone number, in characters.
pub const PHONE_MAX: usize = 15;
/// Maximum length of an email address, in characters.
pub const EMAIL_MAX: usize = 254;

/// Which half of a person's name a [`PersonName`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    First,
    Last,
}

impl NameField {
    /// Payload key for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "firstName",
            Self::Last => "lastName",
        }
    }
}

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyName { field: NameField },
    NameTooLong { field: NameField, max: usize },
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    PhoneTooLong { max: usize },
}

impl UserValidationError {
    /// Payload key of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "userId",
            Self::EmptyName { field } | Self::NameTooLong { field, .. } => field.as_str(),
            Self::EmptyEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::PhoneTooLong { .. } => "phone",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "userId must be a valid UUID"),
            Self::EmptyName { field } => write!(f, "{} must not be empty", field.as_str()),
            Self::NameTooLong { field, max } => {
                write!(f, "{} must be at most {max} characters", field.as_str())
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::PhoneTooLong { max } => write!(f, "phone must be at most {max} characters"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its textual UUID form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a name; surrounding whitespace is trimmed.
    pub fn new(field: NameField, value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName { field });
        }
        if trimmed.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                field,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Login email address.
///
/// ## Invariants
/// - Exactly one `@` separating a non-empty local part and domain.
/// - The domain is stored lower-cased; the local part is kept as given.
/// - No whitespace anywhere in the address.
///
/// # Examples
/// ```
/// use tenancy::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "Ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        if domain.starts_with('.') || domain.ends_with('.') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(format!("{local}@{}", domain.to_lowercase())))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional contact phone number. Stored as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate a phone number. Blank input yields `Ok(None)`.
    pub fn new(value: impl AsRef<str>) -> Result<Option<Self>, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > PHONE_MAX {
            return Err(UserValidationError::PhoneTooLong { max: PHONE_MAX });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Public user profile. Never carries credential material.
///
/// Serialises as `{userId, firstName, lastName, email, phone}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userId")]
    #[schema(value_type = String, format = Uuid, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "Ada")]
    first_name: PersonName,
    #[schema(value_type = String, example = "Lovelace")]
    last_name: PersonName,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
    #[schema(value_type = Option<String>, example = "+441234567890")]
    phone: Option<PhoneNumber>,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(
        id: UserId,
        first_name: PersonName,
        last_name: PersonName,
        email: EmailAddress,
        phone: Option<PhoneNumber>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            phone,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Login email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }
}
