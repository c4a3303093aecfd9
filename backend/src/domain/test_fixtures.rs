//! Shared builders for domain unit tests.

use crate::domain::{
    EmailAddress, NameField, Organisation, OrganisationId, OrganisationName, PersonName, User,
    UserId,
};

pub(crate) fn user(first_name: &str, email: &str) -> User {
    User::new(
        UserId::random(),
        PersonName::new(NameField::First, first_name).expect("first name"),
        PersonName::new(NameField::Last, "Tester").expect("last name"),
        EmailAddress::new(email).expect("email"),
        None,
    )
}

pub(crate) fn organisation(name: &str) -> Organisation {
    Organisation::new(
        OrganisationId::random(),
        OrganisationName::new(name).expect("organisation name"),
        None,
    )
}
