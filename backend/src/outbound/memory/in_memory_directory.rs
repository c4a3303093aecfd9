//! Process-local directory store implementing both repository ports.
//!
//! Used when no database URL is configured and by the HTTP flow tests. State
//! lives behind one mutex so each port call observes and mutates a
//! consistent snapshot, mirroring the transactional behaviour of the Diesel
//! adapters.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    MembershipChange, NewAccount, OrganisationRepository, OrganisationRepositoryError,
    StoredCredentials, UserRepository, UserRepositoryError,
};
use crate::domain::{EmailAddress, Organisation, OrganisationId, PasswordHash, User, UserId};

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, (User, PasswordHash)>,
    emails: HashMap<String, UserId>,
    organisations: HashMap<OrganisationId, Organisation>,
    /// Insertion order doubles as join order.
    memberships: Vec<(OrganisationId, UserId)>,
}

impl DirectoryState {
    fn is_member(&self, organisation: OrganisationId, user: UserId) -> bool {
        self.memberships.contains(&(organisation, user))
    }
}

/// In-memory implementation of [`UserRepository`] and
/// [`OrganisationRepository`]. Clones share state.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use tenancy::outbound::memory::InMemoryDirectory;
///
/// let directory = Arc::new(InMemoryDirectory::default());
/// let users = Arc::clone(&directory);
/// let organisations = directory;
/// # let _ = (users, organisations);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl InMemoryDirectory {
    fn lock(&self) -> MutexGuard<'_, DirectoryState> {
        // A panic mid-update cannot leave partial writes: every mutation
        // below validates first and writes last.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryDirectory {
    async fn create_account(&self, account: &NewAccount) -> Result<(), UserRepositoryError> {
        let mut state = self.lock();
        let email = account.user.email().as_ref();
        if state.emails.contains_key(email) {
            return Err(UserRepositoryError::duplicate_email(email));
        }

        let user_id = account.user.id();
        let org_id = account.organisation.id();
        state.emails.insert(email.to_owned(), user_id);
        state.users.insert(
            user_id,
            (account.user.clone(), account.password_hash.clone()),
        );
        state
            .organisations
            .insert(org_id, account.organisation.clone());
        state.memberships.push((org_id, user_id));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock().users.get(id).map(|(user, _)| user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let state = self.lock();
        let credentials = state
            .emails
            .get(email.as_ref())
            .and_then(|id| state.users.get(id))
            .map(|(user, password_hash)| StoredCredentials {
                user: user.clone(),
                password_hash: password_hash.clone(),
            });
        Ok(credentials)
    }

    async fn organisation_ids(
        &self,
        id: &UserId,
    ) -> Result<HashSet<OrganisationId>, UserRepositoryError> {
        Ok(self
            .lock()
            .memberships
            .iter()
            .filter(|(_, member)| member == id)
            .map(|(org, _)| *org)
            .collect())
    }
}

#[async_trait]
impl OrganisationRepository for InMemoryDirectory {
    async fn create_with_member(
        &self,
        organisation: &Organisation,
        member: &UserId,
    ) -> Result<(), OrganisationRepositoryError> {
        let mut state = self.lock();
        if !state.users.contains_key(member) {
            return Err(OrganisationRepositoryError::missing_reference(format!(
                "user {member}"
            )));
        }
        let org_id = organisation.id();
        if state.organisations.contains_key(&org_id) {
            return Err(OrganisationRepositoryError::query(format!(
                "organisation {org_id} already exists"
            )));
        }
        state.organisations.insert(org_id, organisation.clone());
        state.memberships.push((org_id, *member));
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &OrganisationId,
    ) -> Result<Option<Organisation>, OrganisationRepositoryError> {
        Ok(self.lock().organisations.get(id).cloned())
    }

    async fn list_for_member(
        &self,
        member: &UserId,
    ) -> Result<Vec<Organisation>, OrganisationRepositoryError> {
        let state = self.lock();
        Ok(state
            .memberships
            .iter()
            .filter(|(_, user)| user == member)
            .filter_map(|(org, _)| state.organisations.get(org).cloned())
            .collect())
    }

    async fn add_member(
        &self,
        organisation: &OrganisationId,
        member: &UserId,
    ) -> Result<MembershipChange, OrganisationRepositoryError> {
        let mut state = self.lock();
        if !state.organisations.contains_key(organisation) {
            return Err(OrganisationRepositoryError::missing_reference(format!(
                "organisation {organisation}"
            )));
        }
        if !state.users.contains_key(member) {
            return Err(OrganisationRepositoryError::missing_reference(format!(
                "user {member}"
            )));
        }
        if state.is_member(*organisation, *member) {
            return Ok(MembershipChange::AlreadyMember);
        }
        state.memberships.push((*organisation, *member));
        Ok(MembershipChange::Added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures;
    use rstest::{fixture, rstest};

    #[fixture]
    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::default()
    }

    fn account(first_name: &str, email: &str) -> NewAccount {
        NewAccount {
            user: test_fixtures::user(first_name, email),
            password_hash: PasswordHash::new("$argon2id$stub"),
            organisation: test_fixtures::organisation(&format!("{first_name}'s Organisation")),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_account_links_user_and_organisation(directory: InMemoryDirectory) {
        let account = account("Ada", "ada@example.com");
        directory.create_account(&account).await.expect("create");

        let orgs = directory
            .list_for_member(&account.user.id())
            .await
            .expect("list");
        assert_eq!(orgs, vec![account.organisation.clone()]);

        let creds = directory
            .find_credentials_by_email(account.user.email())
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(creds.user, account.user);
        assert_eq!(creds.password_hash.as_str(), "$argon2id$stub");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_leaves_no_partial_records(directory: InMemoryDirectory) {
        directory
            .create_account(&account("Ada", "ada@example.com"))
            .await
            .expect("first");
        let second = account("Eve", "ada@example.com");

        let err = directory.create_account(&second).await.expect_err("duplicate");

        assert_eq!(err, UserRepositoryError::duplicate_email("ada@example.com"));
        assert_eq!(
            UserRepository::find_by_id(&directory, &second.user.id())
                .await
                .expect("lookup"),
            None
        );
        assert_eq!(
            OrganisationRepository::find_by_id(&directory, &second.organisation.id())
                .await
                .expect("lookup"),
            None
        );
    }

    #[rstest]
    #[tokio::test]
    async fn add_member_is_idempotent(directory: InMemoryDirectory) {
        let owner = account("Ada", "ada@example.com");
        let guest = account("Bob", "bob@example.com");
        directory.create_account(&owner).await.expect("owner");
        directory.create_account(&guest).await.expect("guest");
        let org = owner.organisation.id();

        let first = directory
            .add_member(&org, &guest.user.id())
            .await
            .expect("add");
        let second = directory
            .add_member(&org, &guest.user.id())
            .await
            .expect("add again");

        assert_eq!(first, MembershipChange::Added);
        assert_eq!(second, MembershipChange::AlreadyMember);
        let ids = directory
            .organisation_ids(&guest.user.id())
            .await
            .expect("ids");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&org));
    }

    #[rstest]
    #[tokio::test]
    async fn add_member_rejects_unknown_records(directory: InMemoryDirectory) {
        let owner = account("Ada", "ada@example.com");
        directory.create_account(&owner).await.expect("owner");

        let unknown_user = directory
            .add_member(&owner.organisation.id(), &UserId::random())
            .await;
        let unknown_org = directory
            .add_member(&OrganisationId::random(), &owner.user.id())
            .await;

        assert!(matches!(
            unknown_user,
            Err(OrganisationRepositoryError::MissingReference { .. })
        ));
        assert!(matches!(
            unknown_org,
            Err(OrganisationRepositoryError::MissingReference { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn list_follows_join_order(directory: InMemoryDirectory) {
        let owner = account("Ada", "ada@example.com");
        directory.create_account(&owner).await.expect("owner");
        let extra = test_fixtures::organisation("Engines");
        directory
            .create_with_member(&extra, &owner.user.id())
            .await
            .expect("create");

        let names: Vec<String> = directory
            .list_for_member(&owner.user.id())
            .await
            .expect("list")
            .iter()
            .map(|org| org.name().to_string())
            .collect();
        assert_eq!(names, vec!["Ada's Organisation", "Engines"]);
    }
}
