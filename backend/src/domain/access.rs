//! Organisation-membership visibility rule for user records.

use std::collections::HashSet;

use super::{OrganisationId, UserId};

/// Outcome of a visibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The requester is looking at their own record.
    Own,
    /// Requester and target share at least one organisation.
    SharedOrganisation,
    Denied,
}

impl Visibility {
    pub fn is_allowed(self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Decide whether `requester` may view `target`.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
/// use tenancy::domain::{OrganisationId, UserId, Visibility, record_visibility};
///
/// let shared = OrganisationId::random();
/// let (me, them) = (UserId::random(), UserId::random());
/// let mine = HashSet::from([shared]);
/// let theirs = HashSet::from([shared, OrganisationId::random()]);
/// assert_eq!(
///     record_visibility(me, &mine, them, &theirs),
///     Visibility::SharedOrganisation
/// );
/// ```
pub fn record_visibility(
    requester: UserId,
    requester_orgs: &HashSet<OrganisationId>,
    target: UserId,
    target_orgs: &HashSet<OrganisationId>,
) -> Visibility {
    if requester == target {
        Visibility::Own
    } else if !requester_orgs.is_disjoint(target_orgs) {
        Visibility::SharedOrganisation
    } else {
        Visibility::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn own_record_is_visible_without_memberships() {
        let me = UserId::random();
        let none = HashSet::new();
        assert_eq!(record_visibility(me, &none, me, &none), Visibility::Own);
    }

    #[rstest]
    #[case(true, Visibility::SharedOrganisation)]
    #[case(false, Visibility::Denied)]
    fn other_record_depends_on_intersection(#[case] share: bool, #[case] expected: Visibility) {
        let common = OrganisationId::random();
        let mine = HashSet::from([common, OrganisationId::random()]);
        let theirs = if share {
            HashSet::from([common])
        } else {
            HashSet::from([OrganisationId::random()])
        };
        let outcome = record_visibility(UserId::random(), &mine, UserId::random(), &theirs);
        assert_eq!(outcome, expected);
        assert_eq!(outcome.is_allowed(), share);
    }

    #[rstest]
    fn empty_memberships_deny_other_users() {
        let empty = HashSet::new();
        let outcome = record_visibility(UserId::random(), &empty, UserId::random(), &empty);
        assert_eq!(outcome, Visibility::Denied);
    }
}
