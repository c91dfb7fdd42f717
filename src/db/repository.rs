//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    AnalyticsSummary, Category, CategoryBreakdown, CreateDonationRequest, CreateFoodRequestRequest,
    CreateHistoryRequest, Donation, DonationHistory, DonationStatus, FoodRequest, HistoryStatus,
    RegisterRequest, RequestStatus, Role, StatusBreakdown, UpdateDonationRequest,
    UpdateFoodRequestRequest, UpdateUserRequest, Urgency, User,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, email, password_hash, role, organization, phone, address, created_at FROM users ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, role, organization, phone, address, created_at FROM users WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Look up a user by email. The stored email is already lowercased.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, role, organization, phone, address, created_at FROM users WHERE email = ?"
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create a new user from a registration request and pre-hashed password.
    pub async fn create_user(
        &self,
        request: &RegisterRequest,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let role = Role::from_str(&request.role)
            .ok_or_else(|| AppError::Validation(format!("Unknown role: {}", request.role)))?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let email = request.email.trim().to_lowercase();

        let result = sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, organization, phone, address, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(request.name.trim())
        .bind(&email)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(&request.organization)
        .bind(&request.phone)
        .bind(&request.address)
        .bind(&now)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            if let Some(db_err) = err.as_database_error() {
                if db_err.is_unique_violation() {
                    return Err(AppError::Conflict("Email already registered".to_string()));
                }
            }
            return Err(err.into());
        }

        Ok(User {
            id,
            name: request.name.trim().to_string(),
            email,
            password_hash: password_hash.to_string(),
            role,
            organization: request.organization.clone(),
            phone: request.phone.clone(),
            address: request.address.clone(),
            created_at: now,
        })
    }

    /// Update a user's profile fields. Fields absent from the request are
    /// preserved.
    pub async fn update_user(
        &self,
        id: &str,
        request: &UpdateUserRequest,
    ) -> Result<User, AppError> {
        let existing = self
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        let name = request.name.as_ref().unwrap_or(&existing.name);
        let organization = request
            .organization
            .as_ref()
            .unwrap_or(&existing.organization);
        let phone = request.phone.clone().or(existing.phone.clone());
        let address = request.address.clone().or(existing.address.clone());

        sqlx::query(
            "UPDATE users SET name = ?, organization = ?, phone = ?, address = ? WHERE id = ?",
        )
        .bind(name)
        .bind(organization)
        .bind(&phone)
        .bind(&address)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: id.to_string(),
            name: name.clone(),
            email: existing.email,
            password_hash: existing.password_hash,
            role: existing.role,
            organization: organization.clone(),
            phone,
            address,
            created_at: existing.created_at,
        })
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        Ok(())
    }

    // ==================== DONATION OPERATIONS ====================

    /// List all donations, newest first.
    pub async fn list_donations(&self) -> Result<Vec<Donation>, AppError> {
        let rows = sqlx::query(
            "SELECT id, donor_id, donor_name, title, description, category, weight, unit, expiry_date, pickup_location, pickup_time, status, matches, created_at FROM donations ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(donation_from_row).collect())
    }

    /// List donations owned by a donor.
    pub async fn list_donations_by_donor(&self, donor_id: &str) -> Result<Vec<Donation>, AppError> {
        let rows = sqlx::query(
            "SELECT id, donor_id, donor_name, title, description, category, weight, unit, expiry_date, pickup_location, pickup_time, status, matches, created_at FROM donations WHERE donor_id = ? ORDER BY created_at DESC"
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(donation_from_row).collect())
    }

    /// List donations still open for claiming.
    pub async fn list_available_donations(&self) -> Result<Vec<Donation>, AppError> {
        let rows = sqlx::query(
            "SELECT id, donor_id, donor_name, title, description, category, weight, unit, expiry_date, pickup_location, pickup_time, status, matches, created_at FROM donations WHERE status = 'available' ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(donation_from_row).collect())
    }

    /// Get a donation by ID.
    pub async fn get_donation(&self, id: &str) -> Result<Option<Donation>, AppError> {
        let row = sqlx::query(
            "SELECT id, donor_id, donor_name, title, description, category, weight, unit, expiry_date, pickup_location, pickup_time, status, matches, created_at FROM donations WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(donation_from_row))
    }

    /// Create a new donation owned by the given donor.
    pub async fn create_donation(
        &self,
        donor_id: &str,
        donor_name: &str,
        request: &CreateDonationRequest,
    ) -> Result<Donation, AppError> {
        let category = Category::from_str(&request.category)
            .ok_or_else(|| AppError::Validation(format!("Unknown category: {}", request.category)))?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let matches_json = serde_json::to_string(&Vec::<String>::new())?;

        sqlx::query(
            "INSERT INTO donations (id, donor_id, donor_name, title, description, category, weight, unit, expiry_date, pickup_location, pickup_time, status, matches, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(donor_id)
        .bind(donor_name)
        .bind(&request.title)
        .bind(&request.description)
        .bind(category.as_str())
        .bind(request.weight)
        .bind(&request.unit)
        .bind(&request.expiry_date)
        .bind(&request.pickup_location)
        .bind(&request.pickup_time)
        .bind(DonationStatus::Available.as_str())
        .bind(&matches_json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Donation {
            id,
            donor_id: donor_id.to_string(),
            donor_name: donor_name.to_string(),
            title: request.title.clone(),
            description: request.description.clone(),
            category,
            weight: request.weight,
            unit: request.unit.clone(),
            expiry_date: request.expiry_date.clone(),
            pickup_location: request.pickup_location.clone(),
            pickup_time: request.pickup_time.clone(),
            status: DonationStatus::Available,
            matches: Vec::new(),
            created_at: now,
        })
    }

    /// Update a donation. Fields absent from the request are preserved.
    pub async fn update_donation(
        &self,
        id: &str,
        request: &UpdateDonationRequest,
    ) -> Result<Donation, AppError> {
        let existing = self
            .get_donation(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Donation {} not found", id)))?;

        let category = match &request.category {
            Some(raw) => Category::from_str(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown category: {}", raw)))?,
            None => existing.category,
        };
        let status = match &request.status {
            Some(raw) => DonationStatus::from_str(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", raw)))?,
            None => existing.status,
        };

        let title = request.title.as_ref().unwrap_or(&existing.title);
        let description = request.description.as_ref().unwrap_or(&existing.description);
        let weight = request.weight.unwrap_or(existing.weight);
        let unit = request.unit.as_ref().unwrap_or(&existing.unit);
        let expiry_date = request.expiry_date.as_ref().unwrap_or(&existing.expiry_date);
        let pickup_location = request
            .pickup_location
            .as_ref()
            .unwrap_or(&existing.pickup_location);
        let pickup_time = request.pickup_time.clone().or(existing.pickup_time.clone());
        let matches = request.matches.clone().unwrap_or(existing.matches.clone());
        let matches_json = serde_json::to_string(&matches)?;

        let result = sqlx::query(
            "UPDATE donations SET title = ?, description = ?, category = ?, weight = ?, unit = ?, expiry_date = ?, pickup_location = ?, pickup_time = ?, status = ?, matches = ? WHERE id = ?"
        )
        .bind(title)
        .bind(description)
        .bind(category.as_str())
        .bind(weight)
        .bind(unit)
        .bind(expiry_date)
        .bind(pickup_location)
        .bind(&pickup_time)
        .bind(status.as_str())
        .bind(&matches_json)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Deleted between the read and the write
            return Err(AppError::NotFound(format!("Donation {} not found", id)));
        }

        Ok(Donation {
            id: id.to_string(),
            donor_id: existing.donor_id,
            donor_name: existing.donor_name,
            title: title.clone(),
            description: description.clone(),
            category,
            weight,
            unit: unit.clone(),
            expiry_date: expiry_date.clone(),
            pickup_location: pickup_location.clone(),
            pickup_time,
            status,
            matches,
            created_at: existing.created_at,
        })
    }

    /// Delete a donation.
    pub async fn delete_donation(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM donations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Donation {} not found", id)));
        }

        Ok(())
    }

    /// Claim an available donation for a recipient.
    ///
    /// Runs as a single transaction: the donation row is conditionally removed
    /// first, then the history entry and completed request are written. A
    /// failure at any step rolls everything back, so a claim can never leave
    /// an orphan history record or a half-claimed donation. Of two concurrent
    /// claims exactly one removes the row; the other sees zero rows affected.
    pub async fn claim_donation(
        &self,
        donation_id: &str,
        recipient_id: &str,
        recipient_name: &str,
    ) -> Result<(DonationHistory, FoodRequest), AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM donations WHERE id = ? AND status = 'available' RETURNING id, donor_id, donor_name, title, description, category, weight, unit, expiry_date, pickup_location, pickup_time, status, matches, created_at"
        )
        .bind(donation_id)
        .fetch_optional(&mut *tx)
        .await?;

        let donation = match deleted {
            Some(ref row) => donation_from_row(row),
            None => {
                let still_there = sqlx::query("SELECT status FROM donations WHERE id = ?")
                    .bind(donation_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                return match still_there {
                    Some(_) => Err(AppError::Conflict(
                        "Donation is no longer available".to_string(),
                    )),
                    None => Err(AppError::NotFound(format!(
                        "Donation {} not found",
                        donation_id
                    ))),
                };
            }
        };

        let now = Utc::now().to_rfc3339();

        let history = DonationHistory {
            id: uuid::Uuid::new_v4().to_string(),
            donor_id: donation.donor_id.clone(),
            donor_name: donation.donor_name.clone(),
            recipient_id: Some(recipient_id.to_string()),
            recipient_name: Some(recipient_name.to_string()),
            title: donation.title.clone(),
            description: donation.description.clone(),
            category: donation.category.as_str().to_string(),
            weight: donation.weight,
            unit: donation.unit.clone(),
            pickup_location: donation.pickup_location.clone(),
            donated_at: now.clone(),
            status: HistoryStatus::Donated,
        };

        sqlx::query(
            "INSERT INTO donation_history (id, donor_id, donor_name, recipient_id, recipient_name, title, description, category, weight, unit, pickup_location, donated_at, status) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&history.id)
        .bind(&history.donor_id)
        .bind(&history.donor_name)
        .bind(&history.recipient_id)
        .bind(&history.recipient_name)
        .bind(&history.title)
        .bind(&history.description)
        .bind(&history.category)
        .bind(history.weight)
        .bind(&history.unit)
        .bind(&history.pickup_location)
        .bind(&history.donated_at)
        .bind(history.status.as_str())
        .execute(&mut *tx)
        .await?;

        let request = FoodRequest {
            id: uuid::Uuid::new_v4().to_string(),
            recipient_id: recipient_id.to_string(),
            recipient_name: recipient_name.to_string(),
            title: donation.title.clone(),
            description: donation.description.clone(),
            categories: vec![donation.category.as_str().to_string()],
            quantity: donation.weight,
            unit: donation.unit.clone(),
            urgency: Urgency::Medium,
            pickup_available: true,
            delivery_address: None,
            status: RequestStatus::Completed,
            created_at: now,
        };
        let categories_json = serde_json::to_string(&request.categories)?;

        sqlx::query(
            "INSERT INTO requests (id, recipient_id, recipient_name, title, description, categories, quantity, unit, urgency, pickup_available, delivery_address, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&request.id)
        .bind(&request.recipient_id)
        .bind(&request.recipient_name)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&categories_json)
        .bind(request.quantity)
        .bind(&request.unit)
        .bind(request.urgency.as_str())
        .bind(request.pickup_available as i32)
        .bind(&request.delivery_address)
        .bind(request.status.as_str())
        .bind(&request.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((history, request))
    }

    // ==================== REQUEST OPERATIONS ====================

    /// List all food requests, newest first.
    pub async fn list_requests(&self) -> Result<Vec<FoodRequest>, AppError> {
        let rows = sqlx::query(
            "SELECT id, recipient_id, recipient_name, title, description, categories, quantity, unit, urgency, pickup_available, delivery_address, status, created_at FROM requests ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(request_from_row).collect())
    }

    /// List requests owned by a recipient.
    pub async fn list_requests_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<FoodRequest>, AppError> {
        let rows = sqlx::query(
            "SELECT id, recipient_id, recipient_name, title, description, categories, quantity, unit, urgency, pickup_available, delivery_address, status, created_at FROM requests WHERE recipient_id = ? ORDER BY created_at DESC"
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(request_from_row).collect())
    }

    /// Get a food request by ID.
    pub async fn get_request(&self, id: &str) -> Result<Option<FoodRequest>, AppError> {
        let row = sqlx::query(
            "SELECT id, recipient_id, recipient_name, title, description, categories, quantity, unit, urgency, pickup_available, delivery_address, status, created_at FROM requests WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(request_from_row))
    }

    /// Create a new food request owned by the given recipient.
    pub async fn create_request(
        &self,
        recipient_id: &str,
        recipient_name: &str,
        request: &CreateFoodRequestRequest,
    ) -> Result<FoodRequest, AppError> {
        let urgency = match &request.urgency {
            Some(raw) => Urgency::from_str(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown urgency: {}", raw)))?,
            None => Urgency::Medium,
        };
        let status = match &request.status {
            Some(raw) => RequestStatus::from_str(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", raw)))?,
            None => RequestStatus::Pending,
        };

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let pickup_available = request.pickup_available.unwrap_or(true);
        let categories_json = serde_json::to_string(&request.categories)?;

        sqlx::query(
            "INSERT INTO requests (id, recipient_id, recipient_name, title, description, categories, quantity, unit, urgency, pickup_available, delivery_address, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(recipient_id)
        .bind(recipient_name)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&categories_json)
        .bind(request.quantity)
        .bind(&request.unit)
        .bind(urgency.as_str())
        .bind(pickup_available as i32)
        .bind(&request.delivery_address)
        .bind(status.as_str())
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(FoodRequest {
            id,
            recipient_id: recipient_id.to_string(),
            recipient_name: recipient_name.to_string(),
            title: request.title.clone(),
            description: request.description.clone(),
            categories: request.categories.clone(),
            quantity: request.quantity,
            unit: request.unit.clone(),
            urgency,
            pickup_available,
            delivery_address: request.delivery_address.clone(),
            status,
            created_at: now,
        })
    }

    /// Update a food request. Fields absent from the request are preserved.
    pub async fn update_request(
        &self,
        id: &str,
        request: &UpdateFoodRequestRequest,
    ) -> Result<FoodRequest, AppError> {
        let existing = self
            .get_request(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        let urgency = match &request.urgency {
            Some(raw) => Urgency::from_str(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown urgency: {}", raw)))?,
            None => existing.urgency,
        };
        let status = match &request.status {
            Some(raw) => RequestStatus::from_str(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", raw)))?,
            None => existing.status,
        };

        let title = request.title.as_ref().unwrap_or(&existing.title);
        let description = request.description.as_ref().unwrap_or(&existing.description);
        let categories = request
            .categories
            .clone()
            .unwrap_or(existing.categories.clone());
        let quantity = request.quantity.unwrap_or(existing.quantity);
        let unit = request.unit.as_ref().unwrap_or(&existing.unit);
        let pickup_available = request.pickup_available.unwrap_or(existing.pickup_available);
        let delivery_address = request
            .delivery_address
            .clone()
            .or(existing.delivery_address.clone());
        let categories_json = serde_json::to_string(&categories)?;

        let result = sqlx::query(
            "UPDATE requests SET title = ?, description = ?, categories = ?, quantity = ?, unit = ?, urgency = ?, pickup_available = ?, delivery_address = ?, status = ? WHERE id = ?"
        )
        .bind(title)
        .bind(description)
        .bind(&categories_json)
        .bind(quantity)
        .bind(unit)
        .bind(urgency.as_str())
        .bind(pickup_available as i32)
        .bind(&delivery_address)
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Request {} not found", id)));
        }

        Ok(FoodRequest {
            id: id.to_string(),
            recipient_id: existing.recipient_id,
            recipient_name: existing.recipient_name,
            title: title.clone(),
            description: description.clone(),
            categories,
            quantity,
            unit: unit.clone(),
            urgency,
            pickup_available,
            delivery_address,
            status,
            created_at: existing.created_at,
        })
    }

    /// Delete a food request.
    pub async fn delete_request(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Request {} not found", id)));
        }

        Ok(())
    }

    // ==================== HISTORY OPERATIONS ====================

    /// List the full donation history, most recent transfers first.
    pub async fn list_history(&self) -> Result<Vec<DonationHistory>, AppError> {
        let rows = sqlx::query(
            "SELECT id, donor_id, donor_name, recipient_id, recipient_name, title, description, category, weight, unit, pickup_location, donated_at, status FROM donation_history ORDER BY donated_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(history_from_row).collect())
    }

    /// List history entries for a donor.
    pub async fn list_history_by_donor(
        &self,
        donor_id: &str,
    ) -> Result<Vec<DonationHistory>, AppError> {
        let rows = sqlx::query(
            "SELECT id, donor_id, donor_name, recipient_id, recipient_name, title, description, category, weight, unit, pickup_location, donated_at, status FROM donation_history WHERE donor_id = ? ORDER BY donated_at DESC"
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(history_from_row).collect())
    }

    /// Append a history entry. History is append-only; there is no update or
    /// delete path.
    pub async fn create_history(
        &self,
        request: &CreateHistoryRequest,
    ) -> Result<DonationHistory, AppError> {
        let status = match &request.status {
            Some(raw) => HistoryStatus::from_str(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", raw)))?,
            None => HistoryStatus::Donated,
        };

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO donation_history (id, donor_id, donor_name, recipient_id, recipient_name, title, description, category, weight, unit, pickup_location, donated_at, status) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&request.donor_id)
        .bind(&request.donor_name)
        .bind(&request.recipient_id)
        .bind(&request.recipient_name)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.category)
        .bind(request.weight)
        .bind(&request.unit)
        .bind(&request.pickup_location)
        .bind(&now)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(DonationHistory {
            id,
            donor_id: request.donor_id.clone(),
            donor_name: request.donor_name.clone(),
            recipient_id: request.recipient_id.clone(),
            recipient_name: request.recipient_name.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            category: request.category.clone(),
            weight: request.weight,
            unit: request.unit.clone(),
            pickup_location: request.pickup_location.clone(),
            donated_at: now,
            status,
        })
    }

    // ==================== ANALYTICS ====================

    /// Compute the platform-wide summary served to analyst dashboards.
    pub async fn analytics_summary(&self) -> Result<AnalyticsSummary, AppError> {
        let total_users = self.count("SELECT COUNT(*) AS n FROM users").await?;
        let total_donations = self.count("SELECT COUNT(*) AS n FROM donations").await?;
        let available_donations = self
            .count("SELECT COUNT(*) AS n FROM donations WHERE status = 'available'")
            .await?;
        let total_requests = self.count("SELECT COUNT(*) AS n FROM requests").await?;
        let total_transfers = self
            .count("SELECT COUNT(*) AS n FROM donation_history")
            .await?;

        let weight_row =
            sqlx::query("SELECT COALESCE(SUM(weight), 0.0) AS total FROM donation_history")
                .fetch_one(&self.pool)
                .await?;
        let total_weight_donated: f64 = weight_row.get("total");

        let category_rows = sqlx::query(
            "SELECT category, COUNT(*) AS n, COALESCE(SUM(weight), 0.0) AS total_weight FROM donations GROUP BY category ORDER BY n DESC"
        )
        .fetch_all(&self.pool)
        .await?;
        let donations_by_category = category_rows
            .into_iter()
            .map(|row| CategoryBreakdown {
                category: row.get("category"),
                count: row.get("n"),
                total_weight: row.get("total_weight"),
            })
            .collect();

        let status_rows =
            sqlx::query("SELECT status, COUNT(*) AS n FROM donations GROUP BY status")
                .fetch_all(&self.pool)
                .await?;
        let donations_by_status = status_rows
            .into_iter()
            .map(|row| StatusBreakdown {
                status: row.get("status"),
                count: row.get("n"),
            })
            .collect();

        Ok(AnalyticsSummary {
            total_users,
            total_donations,
            available_donations,
            total_requests,
            total_transfers,
            total_weight_donated,
            donations_by_category,
            donations_by_status,
        })
    }

    async fn count(&self, sql: &str) -> Result<i64, AppError> {
        let row = sqlx::query(sql).fetch_one(&self.pool).await?;
        Ok(row.get("n"))
    }
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    let role: String = row.get("role");
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: Role::from_str(&role).unwrap_or(Role::Recipient),
        organization: row.get("organization"),
        phone: row.get("phone"),
        address: row.get("address"),
        created_at: row.get("created_at"),
    }
}

fn donation_from_row(row: &sqlx::sqlite::SqliteRow) -> Donation {
    let category: String = row.get("category");
    let status: String = row.get("status");
    let matches_str: Option<String> = row.get("matches");
    Donation {
        id: row.get("id"),
        donor_id: row.get("donor_id"),
        donor_name: row.get("donor_name"),
        title: row.get("title"),
        description: row.get("description"),
        category: Category::from_str(&category).unwrap_or(Category::Other),
        weight: row.get("weight"),
        unit: row.get("unit"),
        expiry_date: row.get("expiry_date"),
        pickup_location: row.get("pickup_location"),
        pickup_time: row.get("pickup_time"),
        status: DonationStatus::from_str(&status).unwrap_or(DonationStatus::Available),
        matches: matches_str.map(|s| parse_json_array(&s)).unwrap_or_default(),
        created_at: row.get("created_at"),
    }
}

fn request_from_row(row: &sqlx::sqlite::SqliteRow) -> FoodRequest {
    let urgency: String = row.get("urgency");
    let status: String = row.get("status");
    let pickup_available: i32 = row.get("pickup_available");
    let categories_str: Option<String> = row.get("categories");
    FoodRequest {
        id: row.get("id"),
        recipient_id: row.get("recipient_id"),
        recipient_name: row.get("recipient_name"),
        title: row.get("title"),
        description: row.get("description"),
        categories: categories_str
            .map(|s| parse_json_array(&s))
            .unwrap_or_default(),
        quantity: row.get("quantity"),
        unit: row.get("unit"),
        urgency: Urgency::from_str(&urgency).unwrap_or(Urgency::Medium),
        pickup_available: pickup_available != 0,
        delivery_address: row.get("delivery_address"),
        status: RequestStatus::from_str(&status).unwrap_or(RequestStatus::Pending),
        created_at: row.get("created_at"),
    }
}

fn history_from_row(row: &sqlx::sqlite::SqliteRow) -> DonationHistory {
    let status: String = row.get("status");
    DonationHistory {
        id: row.get("id"),
        donor_id: row.get("donor_id"),
        donor_name: row.get("donor_name"),
        recipient_id: row.get("recipient_id"),
        recipient_name: row.get("recipient_name"),
        title: row.get("title"),
        description: row.get("description"),
        category: row.get("category"),
        weight: row.get("weight"),
        unit: row.get("unit"),
        pickup_location: row.get("pickup_location"),
        donated_at: row.get("donated_at"),
        status: HistoryStatus::from_str(&status).unwrap_or(HistoryStatus::Donated),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
