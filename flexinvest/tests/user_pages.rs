//! Integration tests for the user dashboard pages.

mod common;

use common::{Harness, USER_TOKEN, deposit_json, package_json, withdrawal_json};
use flexinvest::notify::ToastKind;
use flexinvest::pages::{
    DashboardPage, FundWalletPage, InvestmentsPage, MAX_PROOF_BYTES, Page, SupportPage,
    TransactionTab, TransactionsPage, WithdrawPage,
};
use flexinvest::{PageError, ProofUpload, Realm, TokenStorage};
use httpmock::Method::{GET, POST};
use serde_json::{Value, json};
use std::time::Duration;

fn investment_json(id: &str, capital: f64, profit_earned: f64) -> Value {
    json!({
        "id": id,
        "package_id": "pkg_1",
        "capital": capital,
        "daily_profit": capital / 10.0,
        "duration": 30,
        "total_return": capital * 3.0,
        "days_completed": 4,
        "profit_earned": profit_earned,
        "status": "active",
        "start_date": "2024-05-01T09:00:00+00:00",
        "end_date": "2024-05-31T09:00:00+00:00",
        "created_at": "2024-05-01T09:00:00+00:00"
    })
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_dashboard_totals_active_investments() {
    let harness = Harness::signed_in_user(12_500.0).await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/investments/active");
            then.status(200).json_body(json!({"investments": [
                investment_json("i-1", 25_200.0, 10_080.0),
                investment_json("i-2", 50_400.0, 20_160.0),
            ]}));
        })
        .await;

    let page = DashboardPage::new(harness.ctx());
    page.load().await.unwrap();
    assert!(!page.is_loading());

    let view = page.view().await;
    assert_eq!(view.wallet_balance(), 12_500.0);
    assert_eq!(view.active.len(), 2);
    assert_eq!(view.total_capital(), 75_600.0);
    assert_eq!(view.total_earned(), 30_240.0);
    assert!(harness.toasts.all().is_empty());
}

// ============================================================================
// Investments
// ============================================================================

#[tokio::test]
async fn test_insufficient_balance_blocks_subscription() {
    let harness = Harness::signed_in_user(10_000.0).await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/investments/packages");
            then.status(200).json_body(json!({"packages": [
                package_json("pkg_1", 8_000.0),
                package_json("pkg_2", 25_200.0),
            ]}));
        })
        .await;
    let subscribe = harness
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/investments/subscribe");
            then.status(200)
                .json_body(json!({"message": "ok", "investment_id": "i-9"}));
        })
        .await;

    let page = InvestmentsPage::new(harness.ctx());
    page.load().await.unwrap();
    assert_eq!(page.view().packages.len(), 2);

    let result = page.invest("pkg_2").await;

    assert!(matches!(result, Err(PageError::Validation(_))));
    assert_eq!(subscribe.hits_async().await, 0);
    assert_eq!(
        harness.last_toast(),
        Some((
            ToastKind::Error,
            "Insufficient wallet balance. Please fund your wallet first.".to_string()
        ))
    );
}

#[tokio::test]
async fn test_subscription_refreshes_balance_and_lists() {
    let harness = Harness::with_storage(&[("token", USER_TOKEN)]).await;
    // Startup sees the old balance, the refresh after subscribing sees the new one
    let mut before = harness.mock_profile(30_000.0).await;
    harness.session.initialize().await;
    before.delete_async().await;
    harness.mock_profile(4_800.0).await;

    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/investments/packages");
            then.status(200)
                .json_body(json!({"packages": [package_json("pkg_2", 25_200.0)]}));
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/investments/active");
            then.status(200)
                .json_body(json!({"investments": [investment_json("i-9", 25_200.0, 0.0)]}));
        })
        .await;
    let subscribe = harness
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/investments/subscribe")
                .header("Authorization", format!("Bearer {}", USER_TOKEN))
                .json_body(json!({"package_id": "pkg_2"}));
            then.status(200).json_body(json!({
                "message": "Investment started successfully",
                "investment_id": "i-9"
            }));
        })
        .await;

    let page = InvestmentsPage::new(harness.ctx());
    page.load().await.unwrap();
    page.select("pkg_2").unwrap();
    page.confirm().await.unwrap();
    subscribe.assert_async().await;

    let view = page.view();
    assert!(view.selected.is_none());
    assert_eq!(view.active.len(), 1);
    assert_eq!(harness.session.wallet_balance().await, 4_800.0);
    assert_eq!(
        harness.last_toast(),
        Some((ToastKind::Success, "Investment started successfully!".to_string()))
    );
}

#[tokio::test]
async fn test_failed_read_does_not_block_the_others() {
    let harness = Harness::signed_in_user(10_000.0).await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/investments/packages");
            then.status(500);
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/investments/active");
            then.status(200)
                .json_body(json!({"investments": [investment_json("i-1", 8_000.0, 800.0)]}));
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/investments/history");
            then.status(200).json_body(json!({"investments": [
                investment_json("i-1", 8_000.0, 800.0),
                investment_json("i-0", 8_000.0, 24_000.0),
            ]}));
        })
        .await;

    let page = InvestmentsPage::new(harness.ctx());
    page.load().await.unwrap();

    let view = page.view();
    assert!(view.packages.is_empty());
    assert_eq!(view.active.len(), 1);
    assert_eq!(view.history.len(), 2);
    assert!(!page.is_loading());
    // Load failures are logged, not toasted
    assert!(harness.toasts.all().is_empty());
}

// ============================================================================
// Fund wallet
// ============================================================================

#[tokio::test]
async fn test_deposit_uploads_multipart_and_clears_form() {
    let harness = Harness::signed_in_user(0.0).await;
    let create = harness
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/deposits/create")
                .header("Authorization", format!("Bearer {}", USER_TOKEN))
                .body_contains("name=\"amount\"")
                .body_contains("25200")
                .body_contains("filename=\"receipt.png\"");
            then.status(200).json_body(json!({
                "message": "Deposit request submitted",
                "deposit_id": "d-1"
            }));
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/deposits/history");
            then.status(200)
                .json_body(json!({"deposits": [deposit_json("d-1", "pending")]}));
        })
        .await;

    let page = FundWalletPage::new(harness.ctx());
    page.set_amount("25,200");
    page.attach_proof(ProofUpload::new("receipt.png", b"fake png bytes".to_vec()))
        .unwrap();
    page.submit().await.unwrap();
    create.assert_async().await;

    let view = page.view();
    assert!(view.form.amount.is_empty());
    assert!(view.form.proof.is_none());
    assert_eq!(view.deposits.len(), 1);
    assert_eq!(
        harness.last_toast(),
        Some((
            ToastKind::Success,
            "Deposit request submitted successfully!".to_string()
        ))
    );
}

#[tokio::test]
async fn test_deposit_without_proof_sends_nothing() {
    let harness = Harness::signed_in_user(0.0).await;
    let create = harness
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/deposits/create");
            then.status(200);
        })
        .await;

    let page = FundWalletPage::new(harness.ctx());
    page.set_amount("5000");

    assert!(matches!(page.submit().await, Err(PageError::Validation(_))));
    assert_eq!(create.hits_async().await, 0);
    assert_eq!(
        harness.last_toast(),
        Some((
            ToastKind::Error,
            "Please enter amount and upload proof of payment".to_string()
        ))
    );
}

#[tokio::test]
async fn test_oversized_proof_file_is_refused_before_reading() {
    let harness = Harness::signed_in_user(0.0).await;
    let rand_id: u32 = rand::random();
    let dir = std::env::temp_dir().join(format!("flexinvest_proof_{}", rand_id));
    std::fs::create_dir_all(&dir).unwrap();

    // Sparse file one byte over the cap
    let large = dir.join("large.png");
    std::fs::File::create(&large)
        .unwrap()
        .set_len(MAX_PROOF_BYTES as u64 + 1)
        .unwrap();
    let small = dir.join("receipt.png");
    std::fs::write(&small, b"fake png bytes").unwrap();

    let page = FundWalletPage::new(harness.ctx());
    assert!(matches!(
        page.attach_file(&large).await,
        Err(PageError::Validation(_))
    ));
    assert!(page.view().form.proof.is_none());
    assert_eq!(
        harness.last_toast(),
        Some((ToastKind::Error, "File size must be less than 5MB".to_string()))
    );

    assert!(matches!(
        page.attach_file(dir.join("missing.png")).await,
        Err(PageError::Validation(_))
    ));

    page.attach_file(&small).await.unwrap();
    let proof = page.view().form.proof.unwrap();
    assert_eq!(proof.filename, "receipt.png");
    assert_eq!(proof.size(), 14);

    let _ = std::fs::remove_dir_all(&dir);
}

// ============================================================================
// Withdraw
// ============================================================================

#[tokio::test]
async fn test_withdrawal_needs_bank_account() {
    let harness = Harness::signed_in_user(50_000.0).await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user/bank-account");
            then.status(200).json_body(Value::Null);
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/withdrawals/history");
            then.status(200).json_body(json!({"withdrawals": []}));
        })
        .await;
    let create = harness
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/withdrawals/create");
            then.status(200).json_body(json!({"message": "ok"}));
        })
        .await;

    let page = WithdrawPage::new(harness.ctx());
    page.load().await.unwrap();
    assert!(page.view().bank_account.is_none());

    assert!(page.withdraw("10000").await.is_err());
    assert!(page.withdraw("90000").await.is_err());
    assert_eq!(create.hits_async().await, 0);

    let messages = harness.toasts.messages();
    assert_eq!(messages[0], "Please add a bank account first");
    assert_eq!(messages[1], "Insufficient wallet balance");
}

#[tokio::test]
async fn test_save_bank_account_then_withdraw() {
    let harness = Harness::signed_in_user(50_000.0).await;
    let save = harness
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/user/bank-account").json_body(json!({
                "bank_name": "Kuda Bank",
                "account_number": "0123456789",
                "account_name": "Ada Obi"
            }));
            then.status(200)
                .json_body(json!({"message": "Bank account saved successfully"}));
        })
        .await;
    let create = harness
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/withdrawals/create")
                .json_body(json!({"amount": 10000.0}));
            then.status(200)
                .json_body(json!({"message": "Withdrawal request submitted"}));
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/withdrawals/history");
            then.status(200)
                .json_body(json!({"withdrawals": [withdrawal_json("w-1", "pending")]}));
        })
        .await;

    let page = WithdrawPage::new(harness.ctx());
    page.edit_bank_form(|form| {
        form.bank_name = "Kuda Bank".to_string();
        form.account_number = "01234".to_string();
        form.account_name = "Ada Obi".to_string();
    });
    assert!(matches!(
        page.save_bank_account().await,
        Err(PageError::Validation(_))
    ));
    assert_eq!(save.hits_async().await, 0);

    page.edit_bank_form(|form| form.account_number = " 0123456789 ".to_string());
    page.save_bank_account().await.unwrap();
    save.assert_async().await;
    assert!(page.view().bank_account.is_some());

    page.withdraw("10,000").await.unwrap();
    create.assert_async().await;
    assert_eq!(page.view().withdrawals.len(), 1);
    assert_eq!(
        harness.last_toast(),
        Some((
            ToastKind::Success,
            "Withdrawal request submitted successfully!".to_string()
        ))
    );
}

#[tokio::test]
async fn test_withdrawal_success_survives_failed_refresh() {
    let harness = Harness::with_storage(&[("token", USER_TOKEN)]).await;
    let mut startup = harness.mock_profile(50_000.0).await;
    harness.session.initialize().await;
    startup.delete_async().await;

    // The session ends during the refresh that follows the withdrawal
    let refresh = harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user/profile");
            then.status(401).json_body(json!({"detail": "Token expired"}));
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user/bank-account");
            then.status(200).json_body(json!({
                "bank_name": "Kuda Bank",
                "account_number": "0123456789",
                "account_name": "Ada Obi"
            }));
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/withdrawals/history");
            then.status(200).json_body(json!({"withdrawals": []}));
        })
        .await;
    let create = harness
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/withdrawals/create");
            then.status(200)
                .json_body(json!({"message": "Withdrawal request submitted"}));
        })
        .await;

    let page = WithdrawPage::new(harness.ctx());
    page.load().await.unwrap();
    assert!(page.view().bank_account.is_some());

    page.withdraw("1000").await.unwrap();
    create.assert_async().await;
    refresh.assert_async().await;
    assert!(!harness.session.is_authenticated().await);
    assert_eq!(
        harness.toasts.messages(),
        vec!["Withdrawal request submitted successfully!".to_string()]
    );
}

// ============================================================================
// Transactions
// ============================================================================

#[tokio::test]
async fn test_unauthorized_read_expires_only_user_session() {
    let harness = Harness::with_storage(&[
        ("token", USER_TOKEN),
        ("adminToken", common::ADMIN_TOKEN),
    ])
    .await;
    harness.mock_profile(1_000.0).await;
    harness.mock_admin_dashboard().await;
    harness.session.initialize().await;

    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/withdrawals/history");
            then.status(401)
                .json_body(json!({"detail": "Token expired"}));
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/deposits/history");
            then.status(200)
                .json_body(json!({"deposits": [deposit_json("d-1", "approved")]}));
        })
        .await;

    let page = TransactionsPage::new(harness.ctx());
    page.load().await.unwrap();

    assert!(!harness.session.is_authenticated().await);
    assert_eq!(harness.session.token(Realm::User).await, None);
    assert!(harness.session.is_admin().await);
    assert_eq!(harness.storage.get("token").unwrap(), None);
    assert!(harness.storage.get("adminToken").unwrap().is_some());
}

#[tokio::test]
async fn test_transactions_merge_newest_first() {
    let harness = Harness::signed_in_user(0.0).await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/deposits/history");
            then.status(200)
                .json_body(json!({"deposits": [deposit_json("d-1", "approved")]}));
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/withdrawals/history");
            then.status(200)
                .json_body(json!({"withdrawals": [withdrawal_json("w-1", "pending")]}));
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/investments/history");
            then.status(200).json_body(json!({"investments": []}));
        })
        .await;

    let page = TransactionsPage::new(harness.ctx());
    page.load().await.unwrap();

    let ids: Vec<_> = page.view().rows().into_iter().map(|row| row.id).collect();
    assert_eq!(ids, vec!["w-1", "d-1"]);

    page.select_tab(TransactionTab::Deposits);
    assert_eq!(page.view().rows().len(), 1);
}

// ============================================================================
// Support, busy guard and cancellation
// ============================================================================

#[tokio::test]
async fn test_second_submit_while_first_in_flight_is_busy() {
    let harness = Harness::signed_in_user(0.0).await;
    let create = harness
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/complaints/create")
                .json_body(json!({"subject": "Late payout", "message": "Still waiting"}));
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(json!({"message": "Complaint submitted"}));
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/complaints/history");
            then.status(200).json_body(json!({"complaints": []}));
        })
        .await;

    let page = SupportPage::new(harness.ctx());
    let (first, second) = tokio::join!(
        page.submit("Late payout", "Still waiting"),
        page.submit("Late payout", "Still waiting"),
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(PageError::Busy)));
    assert_eq!(create.hits_async().await, 1);
    assert!(!page.is_submitting());
    assert_eq!(
        harness.toasts.messages(),
        vec!["Complaint submitted successfully!".to_string()]
    );
}

#[tokio::test]
async fn test_cancelled_scope_aborts_silently() {
    let harness = Harness::signed_in_user(0.0).await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/complaints/create");
            then.status(200)
                .delay(Duration::from_secs(5))
                .json_body(json!({"message": "Complaint submitted"}));
        })
        .await;

    let page = SupportPage::new(harness.ctx());
    let handle = page.scope_handle();
    let (result, _) = tokio::join!(page.submit("Late payout", "Still waiting"), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
    });

    assert!(matches!(result, Err(PageError::Cancelled)));
    assert!(!page.is_submitting());
    assert!(harness.toasts.all().is_empty());
}

#[tokio::test]
async fn test_support_load_tolerates_missing_links() {
    let harness = Harness::signed_in_user(0.0).await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/support/links");
            then.status(503);
        })
        .await;
    harness
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/complaints/history");
            then.status(200).json_body(json!({"complaints": [{
                "id": "c-1",
                "subject": "Late payout",
                "message": "Still waiting",
                "status": "resolved",
                "admin_response": "Paid out today",
                "created_at": "2024-05-03T09:00:00+00:00"
            }]}));
        })
        .await;

    let page = SupportPage::new(harness.ctx());
    page.load().await.unwrap();

    let view = page.view();
    assert_eq!(view.links, Default::default());
    assert_eq!(view.complaints.len(), 1);
    assert_eq!(
        view.complaints[0].admin_response.as_deref(),
        Some("Paid out today")
    );
}
