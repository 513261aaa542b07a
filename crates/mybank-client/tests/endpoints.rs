//! Request shapes and payload decoding of the domain endpoint bindings.

mod common;

use common::{Harness, asset_summary_json, failure, ok};
use mybank_client::models::{
    AssetType, InvestmentType, PageRequest, PaymentStatus, TransferRequest,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_asset_summary() {
    let h = Harness::authenticated("A1", "R1").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/asset/summary"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ok(asset_summary_json()))
        .mount(&h.server)
        .await;

    let summary = h.client.assets().summary().await.unwrap().into_result().unwrap();
    assert_eq!(summary.accounts_of(AssetType::Card).count(), 1);
    assert_eq!(summary.category_breakdown[0].asset_type, AssetType::Bank);
}

#[tokio::test]
async fn test_asset_sync() {
    let h = Harness::authenticated("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/v1/asset/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&h.server)
        .await;

    assert!(h.client.assets().sync().await.unwrap().is_success());
}

#[tokio::test]
async fn test_spending_with_days_back() {
    let h = Harness::authenticated("A1", "R1").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/spending"))
        .and(query_param("daysBack", "7"))
        .respond_with(ok(json!({
            "totalSpending": 150000,
            "period": "2024-01-08 ~ 2024-01-15",
            "categoryBreakdown": [
                {"category": "Food", "amount": 90000, "transactionCount": 6, "averageAmount": 15000},
                {"category": "Transport", "amount": 60000, "transactionCount": 12, "averageAmount": 5000}
            ]
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let analysis = h
        .client
        .analytics()
        .spending(Some(7))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(analysis.period, "2024-01-08 ~ 2024-01-15");
    assert!(analysis.breakdown_matches_total());
}

#[tokio::test]
async fn test_spending_defaults_to_thirty_days() {
    let h = Harness::authenticated("A1", "R1").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/spending"))
        .and(query_param("daysBack", "30"))
        .respond_with(ok(json!({
            "totalSpending": 0,
            "period": "2023-12-16 ~ 2024-01-15",
            "categoryBreakdown": []
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let analysis = h.client.analytics().spending(None).await.unwrap();
    assert!(analysis.is_success());
}

#[tokio::test]
async fn test_transfer() {
    let h = Harness::authenticated("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/v1/payment/transfer"))
        .and(body_json(json!({
            "fromAccountId": "acc-1",
            "toAccountId": "110-123-456789",
            "recipientName": "Kim",
            "amount": 50000.0,
            "description": "Rent"
        })))
        .respond_with(ok(json!({
            "paymentId": "pay-1",
            "recipientName": "Kim",
            "amount": 50000,
            "status": "COMPLETED",
            "message": "Transfer completed",
            "createdAt": "2024-01-15T10:30:00"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let request = TransferRequest {
        from_account_id: "acc-1".to_string(),
        to_account_id: "110-123-456789".to_string(),
        recipient_name: "Kim".to_string(),
        amount: 50000.0,
        description: Some("Rent".to_string()),
    };
    let payment = h
        .client
        .payments()
        .transfer(&request)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(payment.payment_id, "pay-1");
    assert_eq!(payment.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn test_transfer_rejected() {
    let h = Harness::authenticated("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/v1/payment/transfer"))
        .respond_with(failure(400, "Insufficient balance"))
        .mount(&h.server)
        .await;

    let request = TransferRequest {
        from_account_id: "acc-1".to_string(),
        to_account_id: "110-123-456789".to_string(),
        recipient_name: "Kim".to_string(),
        amount: 90_000_000.0,
        description: None,
    };
    let envelope = h.client.payments().transfer(&request).await.unwrap();
    assert_eq!(envelope.error_message(), Some("Insufficient balance"));
}

#[tokio::test]
async fn test_payment_history_pagination() {
    let h = Harness::authenticated("A1", "R1").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/payment/history"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .respond_with(ok(json!({
            "payments": [{
                "paymentId": "pay-11",
                "recipientName": "Lee",
                "amount": 12000,
                "status": "PENDING",
                "createdAt": "2024-01-10T08:00:00"
            }],
            "totalPages": 3,
            "totalElements": 11
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let history = h
        .client
        .payments()
        .history(PageRequest { page: 2, size: 5 })
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(history.total_elements, 11);
    assert_eq!(history.payments[0].status, PaymentStatus::Pending);
    assert!(history.payments[0].message.is_none());
}

#[tokio::test]
async fn test_payment_by_id() {
    let h = Harness::authenticated("A1", "R1").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/payment/pay-7"))
        .respond_with(ok(json!({
            "paymentId": "pay-7",
            "recipientName": "Park",
            "amount": 3000,
            "status": "FAILED",
            "createdAt": "2024-01-09T12:00:00"
        })))
        .mount(&h.server)
        .await;

    let payment = h.client.payments().payment("pay-7").await.unwrap();
    assert_eq!(
        payment.data().map(|p| p.status),
        Some(PaymentStatus::Failed)
    );
}

#[tokio::test]
async fn test_investment_summary() {
    let h = Harness::authenticated("A1", "R1").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/invest/summary"))
        .respond_with(ok(json!({
            "totalInvested": 25000,
            "totalRoundedUp": 4300,
            "totalRoundUpTransactions": 17,
            "recentInvestments": [{
                "investmentId": "inv-1",
                "productName": "KOSPI 200 ETF",
                "investmentType": "ROUNDUP",
                "amount": 700,
                "investedAt": "2024-01-15T09:00:00"
            }]
        })))
        .mount(&h.server)
        .await;

    let summary = h
        .client
        .investments()
        .summary()
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(summary.total_round_up_transactions, 17);
    assert_eq!(
        summary.recent_investments[0].investment_type,
        InvestmentType::RoundUp
    );
}

#[tokio::test]
async fn test_round_up_toggle() {
    let h = Harness::authenticated("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/v1/invest/roundup/enable/acc-1"))
        .respond_with(ok(serde_json::Value::Null))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/invest/roundup/disable/acc-1"))
        .respond_with(ok(serde_json::Value::Null))
        .expect(1)
        .mount(&h.server)
        .await;

    let investments = h.client.investments();
    assert!(investments.enable_round_up("acc-1").await.unwrap().is_success());
    assert!(investments.disable_round_up("acc-1").await.unwrap().is_success());
}
