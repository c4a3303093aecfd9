//! Organisation data model.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::PersonName;

/// Maximum length of an organisation name, in characters.
pub const ORGANISATION_NAME_MAX: usize = 64;
/// Maximum length of an organisation description, in characters.
pub const ORGANISATION_DESCRIPTION_MAX: usize = 64;

/// Validation errors raised while building organisation values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganisationValidationError {
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
    DescriptionTooLong { max: usize },
}

impl OrganisationValidationError {
    /// Payload key of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "orgId",
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::DescriptionTooLong { .. } => "description",
        }
    }
}

impl fmt::Display for OrganisationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "orgId must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for OrganisationValidationError {}

/// Stable organisation identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrganisationId(Uuid);

impl OrganisationId {
    /// Parse an [`OrganisationId`] from its textual UUID form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, OrganisationValidationError> {
        let id = id.as_ref();
        if id.trim() != id {
            return Err(OrganisationValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| OrganisationValidationError::InvalidId)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for OrganisationId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for OrganisationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Organisation display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrganisationName(String);

impl OrganisationName {
    /// Validate and construct a name; surrounding whitespace is trimmed.
    pub fn new(value: impl AsRef<str>) -> Result<Self, OrganisationValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(OrganisationValidationError::EmptyName);
        }
        if trimmed.chars().count() > ORGANISATION_NAME_MAX {
            return Err(OrganisationValidationError::NameTooLong {
                max: ORGANISATION_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Name of the personal organisation created at registration.
    ///
    /// A first name is at most fifteen characters, so the result always fits.
    ///
    /// # Examples
    /// ```
    /// use tenancy::domain::{NameField, OrganisationName, PersonName};
    ///
    /// let first = PersonName::new(NameField::First, "mary-jane").unwrap();
    /// let name = OrganisationName::default_for(&first);
    /// assert_eq!(name.as_ref(), "Mary-Jane's Organisation");
    /// ```
    pub fn default_for(first_name: &PersonName) -> Self {
        Self(format!("{}'s Organisation", title_case(first_name.as_ref())))
    }
}

impl AsRef<str> for OrganisationName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OrganisationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional free-text description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrganisationDescription(String);

impl OrganisationDescription {
    /// Validate a description. Blank input yields `Ok(None)`.
    pub fn new(value: impl AsRef<str>) -> Result<Option<Self>, OrganisationValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > ORGANISATION_DESCRIPTION_MAX {
            return Err(OrganisationValidationError::DescriptionTooLong {
                max: ORGANISATION_DESCRIPTION_MAX,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for OrganisationDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
///
/// Any non-alphabetic character starts a new run, so `o'neil` becomes
/// `O'Neil` and `anne-marie` becomes `Anne-Marie`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_run_start = true;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if at_run_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_run_start = false;
        } else {
            out.push(ch);
            at_run_start = true;
        }
    }
    out
}

/// Organisation as exposed to clients.
///
/// Serialises as `{orgId, name, description}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Organisation {
    #[serde(rename = "orgId")]
    #[schema(value_type = String, format = Uuid, example = "0b7f6c0e-6f55-4bb8-9d0f-7f7d7c1e2a10")]
    id: OrganisationId,
    #[schema(value_type = String, example = "Ada's Organisation")]
    name: OrganisationName,
    #[schema(value_type = Option<String>, example = "Analytical engines")]
    description: Option<OrganisationDescription>,
}

impl Organisation {
    pub fn new(
        id: OrganisationId,
        name: OrganisationName,
        description: Option<OrganisationDescription>,
    ) -> Self {
        Self {
            id,
            name,
            description,
        }
    }

    pub fn id(&self) -> OrganisationId {
        self.id
    }

    pub fn name(&self) -> &OrganisationName {
        &self.name
    }

    pub fn description(&self) -> Option<&OrganisationDescription> {
        self.description.as_ref()
    }
}

/// Validated request to create an organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganisation {
    pub name: OrganisationName,
    pub description: Option<OrganisationDescription>,
}

impl NewOrganisation {
    /// Validate raw payload values.
    pub fn try_from_parts(
        name: &str,
        description: Option<&str>,
    ) -> Result<Self, OrganisationValidationError> {
        let name = OrganisationName::new(name)?;
        let description = match description {
            Some(raw) => OrganisationDescription::new(raw)?,
            None => None,
        };
        Ok(Self { name, description })
    }

    /// Assign a fresh identifier, producing the stored organisation.
    pub fn into_organisation(self) -> Organisation {
        Organisation::new(OrganisationId::random(), self.name, self.description)
    }
}
