//! Tests for AccountService ownership and goal-box rules.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::accounts::{
        Account, AccountError, AccountKind, AccountService, AccountServiceTrait,
    };
    use crate::errors::Error;
    use crate::goals::GoalCategory;
    use crate::test_support::{user, MockAccountRepository, MockUserRepository};

    fn setup(accounts: Vec<Account>) -> (AccountService, Arc<MockAccountRepository>) {
        let account_repo = Arc::new(MockAccountRepository::with(accounts));
        let user_repo = Arc::new(MockUserRepository::with(vec![
            user("ana_souza", "Ana Souza", &["123456-7"], "x"),
            user("bruno", "Bruno", &["765432-1", "000000-0"], "x"),
        ]));
        (
            AccountService::new(account_repo.clone(), user_repo),
            account_repo,
        )
    }

    fn savings(number: &str, owner: &str, balance: Decimal) -> Account {
        Account::restore(number, owner, balance, AccountKind::savings()).unwrap()
    }

    fn default_accounts() -> Vec<Account> {
        vec![
            savings("123456-7", "Ana Souza", dec!(500)),
            savings("765432-1", "Bruno", dec!(100)),
        ]
    }

    // ==================== Deposit / Withdraw ====================

    #[tokio::test]
    async fn test_deposit_updates_owned_account() {
        let (service, repo) = setup(default_accounts());
        let account = service
            .deposit("ana_souza", "123456-7", dec!(250))
            .await
            .unwrap();
        assert_eq!(account.balance(), dec!(750));
        assert_eq!(repo.balance_of("123456-7"), Some(dec!(750)));
    }

    #[tokio::test]
    async fn test_deposit_into_foreign_account_is_denied() {
        let (service, repo) = setup(default_accounts());
        let err = service
            .deposit("ana_souza", "765432-1", dec!(10))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_)));
        assert_eq!(repo.balance_of("765432-1"), Some(dec!(100)));
    }

    #[tokio::test]
    async fn test_withdraw_enforces_rules_without_side_effects() {
        let (service, repo) = setup(default_accounts());
        let err = service
            .withdraw("ana_souza", "123456-7", dec!(600))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Account(AccountError::InsufficientFunds { .. })
        ));
        let err = service
            .withdraw("ana_souza", "123456-7", dec!(1001))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Account(AccountError::LimitExceeded { .. })));
        assert_eq!(repo.balance_of("123456-7"), Some(dec!(500)));
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let (service, _) = setup(default_accounts());
        let err = service
            .deposit("ana_souza", "999999-9", dec!(10))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (service, _) = setup(default_accounts());
        let err = service
            .deposit("ghost", "123456-7", dec!(10))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    // ==================== Goal boxes ====================

    #[tokio::test]
    async fn test_create_goal_box_generates_number_for_owner() {
        let (service, _) = setup(default_accounts());
        let created = service
            .create_goal_box("ana_souza", GoalCategory::Travel)
            .await
            .unwrap();
        assert_eq!(created.account_number, "VIAGEM-001");
        assert_eq!(created.owner, "Ana Souza");
        assert!(created.balance().is_zero());

        let other = service
            .create_goal_box("bruno", GoalCategory::Travel)
            .await
            .unwrap();
        assert_eq!(other.account_number, "VIAGEM-002");
    }

    #[tokio::test]
    async fn test_duplicate_goal_box_category_is_rejected() {
        let (service, _) = setup(default_accounts());
        service
            .create_goal_box("ana_souza", GoalCategory::Career)
            .await
            .unwrap();
        let err = service
            .create_goal_box("ana_souza", GoalCategory::Career)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_delete_goal_box_requires_zero_balance() {
        let (service, repo) = setup(default_accounts());
        service
            .create_goal_box("ana_souza", GoalCategory::EmergencyFund)
            .await
            .unwrap();
        service
            .deposit("ana_souza", "EMERG-001", dec!(30))
            .await
            .unwrap();

        let err = service
            .delete_goal_box("ana_souza", "EMERG-001")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Account(AccountError::NonZeroBalance { .. })
        ));

        service
            .withdraw("ana_souza", "EMERG-001", dec!(30))
            .await
            .unwrap();
        service
            .delete_goal_box("ana_souza", "EMERG-001")
            .await
            .unwrap();
        assert_eq!(repo.balance_of("EMERG-001"), None);
    }

    #[tokio::test]
    async fn test_delete_goal_box_rejects_regular_account() {
        let (service, _) = setup(vec![savings("123456-7", "Ana Souza", Decimal::ZERO)]);
        let err = service
            .delete_goal_box("ana_souza", "123456-7")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Account(AccountError::NotAGoalBox(_))));
    }

    #[tokio::test]
    async fn test_delete_foreign_goal_box_is_denied() {
        let (service, repo) = setup(default_accounts());
        service
            .create_goal_box("bruno", GoalCategory::HomeRenovation)
            .await
            .unwrap();
        let err = service
            .delete_goal_box("ana_souza", "CASA-001")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_)));
        assert!(repo.balance_of("CASA-001").is_some());
    }

    // ==================== Listing and reports ====================

    #[tokio::test]
    async fn test_listing_separates_accounts_and_goal_boxes() {
        let (service, _) = setup(default_accounts());
        service
            .create_goal_box("ana_souza", GoalCategory::Travel)
            .await
            .unwrap();
        service
            .create_goal_box("ana_souza", GoalCategory::Career)
            .await
            .unwrap();

        let accounts = service.list_by_user("ana_souza").unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_number, "123456-7");

        let boxes = service.list_goal_boxes_by_user("ana_souza").unwrap();
        let numbers: Vec<&str> = boxes.iter().map(|b| b.account_number.as_str()).collect();
        assert_eq!(numbers, vec!["CARREIRA-001", "VIAGEM-001"]);
    }

    #[tokio::test]
    async fn test_dangling_profile_reference_is_skipped() {
        let (service, _) = setup(default_accounts());
        let accounts = service.list_by_user("bruno").unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_number, "765432-1");
    }

    #[tokio::test]
    async fn test_report_collects_everything_for_holder() {
        let (service, _) = setup(default_accounts());
        service
            .create_goal_box("ana_souza", GoalCategory::Travel)
            .await
            .unwrap();
        service
            .deposit("ana_souza", "VIAGEM-001", dec!(20))
            .await
            .unwrap();
        let report = service.report_for_user("ana_souza").unwrap();
        assert_eq!(report.holder_name, "Ana Souza");
        assert_eq!(report.accounts.len(), 1);
        assert_eq!(report.goal_boxes.len(), 1);
        assert_eq!(report.total_balance().unwrap(), dec!(520));
    }

    // ==================== Interest ====================

    #[tokio::test]
    async fn test_interest_run_skips_checking_accounts() {
        let checking =
            Account::restore("111111-1", "Ana Souza", dec!(100), AccountKind::Checking).unwrap();
        let mut accounts = default_accounts();
        accounts.push(checking);
        let (service, repo) = setup(accounts);

        let run = service.accrue_interest_for_all().await.unwrap();
        assert_eq!(run.credited, 2);
        assert_eq!(run.failed, 0);
        assert_eq!(run.total_interest, dec!(3.00));
        assert_eq!(repo.balance_of("123456-7"), Some(dec!(502.50)));
        assert_eq!(repo.balance_of("111111-1"), Some(dec!(100)));
    }
}
