//! Tests for registration and login.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal_macros::dec;

    use crate::accounts::{Account, AccountKind, AccountRepositoryTrait};
    use crate::errors::Error;
    use crate::test_support::{user, MockAccountRepository, MockUserRepository};
    use crate::users::{is_hashed, RegistrationForm, UserService, UserServiceTrait};

    fn form(name: &str, account_number: &str) -> RegistrationForm {
        RegistrationForm {
            display_name: name.to_string(),
            phone: "81984792068".to_string(),
            email: "ana@example.com".to_string(),
            national_id: "12345678901".to_string(),
            birth_date: "1990-04-12".to_string(),
            password: "segredo1".to_string(),
            account_number: account_number.to_string(),
            accept_privacy_policy: true,
        }
    }

    fn setup(
        users: MockUserRepository,
    ) -> (UserService, Arc<MockUserRepository>, Arc<MockAccountRepository>) {
        let users = Arc::new(users);
        let accounts = Arc::new(MockAccountRepository::default());
        (
            UserService::new(users.clone(), accounts.clone()),
            users,
            accounts,
        )
    }

    #[tokio::test]
    async fn test_register_opens_savings_account() {
        let (service, users, accounts) = setup(MockUserRepository::default());
        let user = service.register(form("Ana Souza", "1234567")).await.unwrap();

        assert_eq!(user.username, "ana_souza");
        assert_eq!(user.account_numbers, vec!["123456-7".to_string()]);
        assert!(is_hashed(&user.password_hash));

        let account = accounts.find("123456-7").unwrap().unwrap();
        assert_eq!(account.owner, "Ana Souza");
        assert_eq!(account.kind, AccountKind::savings());
        assert!(users.users.lock().unwrap().contains_key("ana_souza"));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username() {
        let (service, _, _) = setup(MockUserRepository::default());
        service.register(form("Ana Souza", "1234567")).await.unwrap();
        let err = service
            .register(form("ana souza", "7654321"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_account_number() {
        let (service, _, _) = setup(MockUserRepository::default());
        service.register(form("Ana Souza", "1234567")).await.unwrap();
        let err = service
            .register(form("Bruno", "123456-7"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_failed_user_insert_removes_new_account() {
        let failing = MockUserRepository {
            fail_inserts: true,
            ..Default::default()
        };
        let (service, _, accounts) = setup(failing);
        assert!(service.register(form("Ana Souza", "1234567")).await.is_err());
        assert!(accounts.find("123456-7").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_accepts_unformatted_account_number() {
        let (service, _, _) = setup(MockUserRepository::default());
        service.register(form("Ana Souza", "1234567")).await.unwrap();

        let session = service.login("1234567", "segredo1").await.unwrap();
        assert_eq!(session.username, "ana_souza");
        assert_eq!(session.display_name, "Ana Souza");
        assert_eq!(session.account_number, "123456-7");

        let session = service.login("123456-7", "segredo1").await.unwrap();
        assert_eq!(session.account_number, "123456-7");
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password_and_unknown_account() {
        let (service, _, _) = setup(MockUserRepository::default());
        service.register(form("Ana Souza", "1234567")).await.unwrap();
        assert!(matches!(
            service.login("1234567", "errado").await,
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("9999999", "segredo1").await,
            Err(Error::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_upgrades_plaintext_password() {
        let legacy = MockUserRepository::with(vec![user(
            "ana_souza",
            "Ana Souza",
            &["123456-7"],
            "123456",
        )]);
        let (service, users, accounts) = setup(legacy);
        accounts
            .create(
                Account::restore("123456-7", "Ana Souza", dec!(10), AccountKind::savings())
                    .unwrap(),
            )
            .await
            .unwrap();

        service.login("1234567", "123456").await.unwrap();
        let stored = users
            .users
            .lock()
            .unwrap()
            .get("ana_souza")
            .unwrap()
            .password_hash
            .clone();
        assert!(is_hashed(&stored));
        service.login("1234567", "123456").await.unwrap();
    }

    #[tokio::test]
    async fn test_login_with_empty_input_is_a_validation_error() {
        let (service, _, _) = setup(MockUserRepository::default());
        assert!(matches!(
            service.login("  ", "segredo1").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.login("1234567", "").await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_get_user_reports_missing_user() {
        let (service, _, _) = setup(MockUserRepository::default());
        assert!(matches!(service.get_user("ghost"), Err(Error::NotFound(_))));
    }
}
