//! Integration tests for the FoodShare backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            jwt_secret: "test-signing-secret".to_string(),
            token_ttl_hours: 1,
            cors_origins: None,
            log_level: "warn".to_string(),
        };

        let state = AppState {
            repo,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a user and return (token, user id).
    async fn register(&self, role: &str, email: &str) -> (String, String) {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "name": format!("{} person", role),
                "email": email,
                "password": "correct-horse-battery",
                "role": role,
                "organization": format!("{} org", role)
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 201);
        let body: Value = resp.json().await.unwrap();
        let token = body["token"].as_str().unwrap().to_string();
        let user_id = body["user"]["id"].as_str().unwrap().to_string();
        (token, user_id)
    }

    /// Create a donation as the given donor and return the document.
    async fn create_donation(&self, token: &str, title: &str, category: &str, weight: f64) -> Value {
        let resp = self
            .client
            .post(self.url("/api/donations"))
            .bearer_auth(token)
            .json(&json!({
                "title": title,
                "description": "Freshly picked, needs a home",
                "category": category,
                "weight": weight,
                "expiryDate": future_date(),
                "pickupLocation": "12 Market Street"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 201);
        resp.json().await.unwrap()
    }
}

fn future_date() -> String {
    (chrono::Utc::now() + chrono::Duration::days(7)).to_rfc3339()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "Server is running");
}

#[tokio::test]
async fn test_register_and_login() {
    let fixture = TestFixture::new().await;

    let (_, user_id) = fixture.register("donor", "greens@example.com").await;

    // Login with the same credentials
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({
            "email": "greens@example.com",
            "password": "correct-horse-battery"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["token"].as_str().unwrap().len() > 20);
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["role"], "donor");
    // The password hash must never be serialized
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());

    // Wrong password is rejected
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({
            "email": "greens@example.com",
            "password": "wrong-password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let fixture = TestFixture::new().await;

    fixture.register("donor", "dup@example.com").await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth/register"))
        .json(&json!({
            "name": "Second",
            "email": "dup@example.com",
            "password": "another-password",
            "role": "recipient",
            "organization": "Second Org"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Email already registered");

    // Email comparison is case-insensitive
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/register"))
        .json(&json!({
            "name": "Third",
            "email": "DUP@example.com",
            "password": "another-password",
            "role": "recipient",
            "organization": "Third Org"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_register_validation() {
    let fixture = TestFixture::new().await;

    // Password too short
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/register"))
        .json(&json!({
            "name": "Shorty",
            "email": "short@example.com",
            "password": "short",
            "role": "donor",
            "organization": "Org"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("Password"));

    // Role outside the enum
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/register"))
        .json(&json!({
            "name": "Roleless",
            "email": "role@example.com",
            "password": "long-enough-password",
            "role": "superuser",
            "organization": "Org"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let fixture = TestFixture::new().await;

    // No token
    let resp = fixture
        .client
        .get(fixture.url("/api/donations"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());

    // Garbage token
    let resp = fixture
        .client
        .get(fixture.url("/api/donations"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_verify_endpoint() {
    let fixture = TestFixture::new().await;

    let (token, user_id) = fixture.register("analyst", "numbers@example.com").await;

    let resp = fixture
        .client
        .get(fixture.url("/api/auth/verify"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["email"], "numbers@example.com");
}

#[tokio::test]
async fn test_donation_crud() {
    let fixture = TestFixture::new().await;

    let (token, donor_id) = fixture.register("donor", "farm@example.com").await;

    let created = fixture
        .create_donation(&token, "Crate of carrots", "Vegetables", 12.5)
        .await;
    let donation_id = created["id"].as_str().unwrap();

    // Defaults applied on create
    assert_eq!(created["status"], "available");
    assert_eq!(created["matches"].as_array().unwrap().len(), 0);
    assert_eq!(created["unit"], "kg");
    assert_eq!(created["donorId"], donor_id.as_str());

    // Visible in list-all
    let resp = fixture
        .client
        .get(fixture.url("/api/donations"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let all: Value = resp.json().await.unwrap();
    assert!(all
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d["id"] == donation_id));

    // Visible in list-by-donor
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/donations/donor/{}", donor_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let by_donor: Value = resp.json().await.unwrap();
    assert_eq!(by_donor.as_array().unwrap().len(), 1);

    // Update merges: only the status changes, other fields are preserved
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/donations/{}", donation_id)))
        .bearer_auth(&token)
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["title"], "Crate of carrots");
    assert_eq!(updated["weight"], 12.5);
    assert_eq!(updated["category"], "Vegetables");

    // Delete
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/donations/{}", donation_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Deleting again yields not-found, not a server error
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/donations/{}", donation_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_donation_validation() {
    let fixture = TestFixture::new().await;

    let (token, _) = fixture.register("donor", "strict@example.com").await;

    // Category outside the enum
    let resp = fixture
        .client
        .post(fixture.url("/api/donations"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Mystery box",
            "description": "Unlabeled",
            "category": "Beverages",
            "weight": 5.0,
            "expiryDate": future_date(),
            "pickupLocation": "Somewhere"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("category"));

    // Non-positive weight
    let resp = fixture
        .client
        .post(fixture.url("/api/donations"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Empty crate",
            "description": "Nothing in it",
            "category": "Other",
            "weight": -3.0,
            "expiryDate": future_date(),
            "pickupLocation": "Somewhere"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Expiry in the past
    let resp = fixture
        .client
        .post(fixture.url("/api/donations"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Old bread",
            "description": "Past its best",
            "category": "Bakery",
            "weight": 2.0,
            "expiryDate": "2020-01-01T00:00:00Z",
            "pickupLocation": "Somewhere"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Bad status on update
    let created = fixture
        .create_donation(&token, "Crate of apples", "Fruits", 8.0)
        .await;
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/donations/{}", created["id"].as_str().unwrap())))
        .bearer_auth(&token)
        .json(&json!({ "status": "vanished" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_request_crud() {
    let fixture = TestFixture::new().await;

    let (token, recipient_id) = fixture.register("recipient", "shelter@example.com").await;

    // Create
    let resp = fixture
        .client
        .post(fixture.url("/api/requests"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Weekly produce",
            "description": "Vegetables for the soup kitchen",
            "categories": ["Vegetables", "Bakery"],
            "quantity": 30.0,
            "urgency": "high"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    let request_id = created["id"].as_str().unwrap();
    assert_eq!(created["recipientId"], recipient_id.as_str());
    assert_eq!(created["status"], "pending");
    assert_eq!(created["urgency"], "high");
    assert_eq!(created["pickupAvailable"], true);

    // List by recipient
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/requests/recipient/{}", recipient_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let listed: Value = resp.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Update status only; the rest is preserved
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/requests/{}", request_id)))
        .bearer_auth(&token)
        .json(&json!({ "status": "matched" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["status"], "matched");
    assert_eq!(updated["title"], "Weekly produce");
    assert_eq!(updated["categories"].as_array().unwrap().len(), 2);

    // Unknown urgency rejected
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/requests/{}", request_id)))
        .bearer_auth(&token)
        .json(&json!({ "urgency": "critical" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Delete
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/requests/{}", request_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/requests/{}", request_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_history_create_and_list() {
    let fixture = TestFixture::new().await;

    let (token, donor_id) = fixture.register("donor", "bakery@example.com").await;

    let resp = fixture
        .client
        .post(fixture.url("/api/donation-history"))
        .bearer_auth(&token)
        .json(&json!({
            "donorId": donor_id,
            "donorName": "Corner Bakery",
            "title": "Day-old loaves",
            "description": "Two trays of bread",
            "category": "Bakery",
            "weight": 6.0,
            "pickupLocation": "Back entrance"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["status"], "donated");
    assert_eq!(created["unit"], "kg");
    assert!(created["donatedAt"].is_string());

    // Full listing
    let resp = fixture
        .client
        .get(fixture.url("/api/donation-history"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let all: Value = resp.json().await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 1);

    // Listing scoped to the donor
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/donation-history/donor/{}", donor_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let by_donor: Value = resp.json().await.unwrap();
    assert_eq!(by_donor.as_array().unwrap().len(), 1);

    // Weight must be positive
    let resp = fixture
        .client
        .post(fixture.url("/api/donation-history"))
        .bearer_auth(&token)
        .json(&json!({
            "donorId": donor_id,
            "donorName": "Corner Bakery",
            "title": "Nothing",
            "description": "Empty entry",
            "category": "Bakery",
            "weight": 0.0,
            "pickupLocation": "Back entrance"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_claim_end_to_end() {
    let fixture = TestFixture::new().await;

    let (donor_token, donor_id) = fixture.register("donor", "garden@example.com").await;
    let (recipient_token, recipient_id) =
        fixture.register("recipient", "pantry@example.com").await;

    let donation = fixture
        .create_donation(&donor_token, "Fresh greens", "Vegetables", 25.0)
        .await;
    let donation_id = donation["id"].as_str().unwrap();

    // Recipient claims it
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/donations/{}/claim", donation_id)))
        .bearer_auth(&recipient_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let claim: Value = resp.json().await.unwrap();
    assert_eq!(claim["history"]["category"], "Vegetables");
    assert_eq!(claim["history"]["weight"], 25.0);
    assert_eq!(claim["history"]["donorId"], donor_id.as_str());
    assert_eq!(claim["history"]["recipientId"], recipient_id.as_str());
    assert_eq!(claim["history"]["status"], "donated");
    assert_eq!(claim["request"]["status"], "completed");
    assert_eq!(claim["request"]["quantity"], 25.0);

    // Donation no longer listed as available
    let resp = fixture
        .client
        .get(fixture.url("/api/donations/available"))
        .bearer_auth(&recipient_token)
        .send()
        .await
        .unwrap();
    let available: Value = resp.json().await.unwrap();
    assert!(available
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["id"] != donation_id));

    // History reflects the transfer
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/donation-history/donor/{}", donor_id)))
        .bearer_auth(&donor_token)
        .send()
        .await
        .unwrap();
    let history: Value = resp.json().await.unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);

    // The completed request belongs to the recipient
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/requests/recipient/{}", recipient_id)))
        .bearer_auth(&recipient_token)
        .send()
        .await
        .unwrap();
    let requests: Value = resp.json().await.unwrap();
    assert_eq!(requests.as_array().unwrap().len(), 1);
    assert_eq!(requests[0]["status"], "completed");
}

#[tokio::test]
async fn test_claim_rejections() {
    let fixture = TestFixture::new().await;

    let (donor_token, _) = fixture.register("donor", "orchard@example.com").await;
    let (recipient_token, _) = fixture.register("recipient", "kitchen@example.com").await;

    // Claiming a nonexistent donation
    let resp = fixture
        .client
        .post(fixture.url("/api/donations/no-such-id/claim"))
        .bearer_auth(&recipient_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Donors cannot claim
    let donation = fixture
        .create_donation(&donor_token, "Apples", "Fruits", 10.0)
        .await;
    let donation_id = donation["id"].as_str().unwrap().to_string();

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/donations/{}/claim", donation_id)))
        .bearer_auth(&donor_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // A donation that is no longer available cannot be claimed
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/donations/{}", donation_id)))
        .bearer_auth(&donor_token)
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/donations/{}/claim", donation_id)))
        .bearer_auth(&recipient_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_concurrent_claims_single_winner() {
    let fixture = TestFixture::new().await;

    let (donor_token, _) = fixture.register("donor", "depot@example.com").await;
    let (token_a, _) = fixture.register("recipient", "first@example.com").await;
    let (token_b, _) = fixture.register("recipient", "second@example.com").await;

    let donation = fixture
        .create_donation(&donor_token, "Canned soup", "Canned Goods", 40.0)
        .await;
    let donation_id = donation["id"].as_str().unwrap().to_string();

    let url = fixture.url(&format!("/api/donations/{}/claim", donation_id));
    let (resp_a, resp_b) = tokio::join!(
        fixture.client.post(&url).bearer_auth(&token_a).send(),
        fixture.client.post(&url).bearer_auth(&token_b).send()
    );

    let status_a = resp_a.unwrap().status().as_u16();
    let status_b = resp_b.unwrap().status().as_u16();

    // Exactly one claim wins; the loser sees conflict or not-found
    let statuses = [status_a, status_b];
    assert_eq!(statuses.iter().filter(|s| **s == 201).count(), 1);
    let loser = statuses.iter().find(|s| **s != 201).unwrap();
    assert!(*loser == 404 || *loser == 409);

    // Only one history entry and one request were written
    let resp = fixture
        .client
        .get(fixture.url("/api/donation-history"))
        .bearer_auth(&donor_token)
        .send()
        .await
        .unwrap();
    let history: Value = resp.json().await.unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);

    let resp = fixture
        .client
        .get(fixture.url("/api/requests"))
        .bearer_auth(&donor_token)
        .send()
        .await
        .unwrap();
    let requests: Value = resp.json().await.unwrap();
    assert_eq!(requests.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_routes_and_role_guard() {
    let fixture = TestFixture::new().await;

    let (admin_token, _) = fixture.register("admin", "ops@example.com").await;
    let (donor_token, donor_id) = fixture.register("donor", "stall@example.com").await;

    // Listing users requires the admin role
    let resp = fixture
        .client
        .get(fixture.url("/api/users"))
        .bearer_auth(&donor_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = fixture
        .client
        .get(fixture.url("/api/users"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let users: Value = resp.json().await.unwrap();
    assert_eq!(users.as_array().unwrap().len(), 2);
    for user in users.as_array().unwrap() {
        assert!(user.get("passwordHash").is_none());
    }

    // A user can read and update their own profile
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/users/{}", donor_id)))
        .bearer_auth(&donor_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/users/{}", donor_id)))
        .bearer_auth(&donor_token)
        .json(&json!({ "organization": "Renamed Stall" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["organization"], "Renamed Stall");

    // But not someone else's
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/users/{}", donor_id)))
        .bearer_auth(&fixture.register("recipient", "other@example.com").await.0)
        .json(&json!({ "organization": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Deletion is admin-only
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/users/{}", donor_id)))
        .bearer_auth(&donor_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/users/{}", donor_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/users/{}", donor_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_analytics_summary() {
    let fixture = TestFixture::new().await;

    let (donor_token, _) = fixture.register("donor", "farmstand@example.com").await;
    let (recipient_token, _) = fixture.register("recipient", "foodbank@example.com").await;
    let (analyst_token, _) = fixture.register("analyst", "charts@example.com").await;

    fixture
        .create_donation(&donor_token, "Carrots", "Vegetables", 10.0)
        .await;
    let claimed = fixture
        .create_donation(&donor_token, "Potatoes", "Vegetables", 15.0)
        .await;

    fixture
        .client
        .post(fixture.url(&format!(
            "/api/donations/{}/claim",
            claimed["id"].as_str().unwrap()
        )))
        .bearer_auth(&recipient_token)
        .send()
        .await
        .unwrap();

    let resp = fixture
        .client
        .get(fixture.url("/api/analytics/summary"))
        .bearer_auth(&analyst_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let summary: Value = resp.json().await.unwrap();

    assert_eq!(summary["totalUsers"], 3);
    // The claimed donation was retired into history
    assert_eq!(summary["totalDonations"], 1);
    assert_eq!(summary["availableDonations"], 1);
    assert_eq!(summary["totalTransfers"], 1);
    assert_eq!(summary["totalRequests"], 1);
    assert_eq!(summary["totalWeightDonated"], 15.0);

    let by_category = summary["donationsByCategory"].as_array().unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0]["category"], "Vegetables");
    assert_eq!(by_category[0]["count"], 1);
}

#[tokio::test]
async fn test_not_found_errors() {
    let fixture = TestFixture::new().await;

    let (token, _) = fixture.register("donor", "ghost@example.com").await;

    let resp = fixture
        .client
        .put(fixture.url("/api/donations/no-such-id"))
        .bearer_auth(&token)
        .json(&json!({ "title": "Phantom" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("not found"));

    let resp = fixture
        .client
        .put(fixture.url("/api/requests/no-such-id"))
        .bearer_auth(&token)
        .json(&json!({ "title": "Phantom" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = fixture
        .client
        .get(fixture.url("/api/users/no-such-id"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
