//! Wire types for the store-rating REST API.
//!
//! Responses are read-only projections of backend rows. Request bodies use
//! the backend's camelCase keys.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::session::Role;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

/// Admin-created account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub role: Role,
}

/// Admin-created store, optionally with a fresh owner account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStore {
    pub name: String,
    pub email: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSubmission {
    pub store_id: u64,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginUser {
    pub role: Role,
}

/// Platform totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_stores: u64,
    pub total_ratings: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    pub role: Role,
    /// Only store owners carry an aggregate rating.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub rating: Option<f64>,
}

impl User {
    /// `4.5/5` for rated store owners, `N/A` otherwise.
    pub fn rating_display(&self) -> String {
        match (self.role, self.rating) {
            (Role::StoreOwner, Some(r)) => format!("{r:.1}/5"),
            _ => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Store {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
}

/// Store as seen by an end user, with their own rating if any.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreListing {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default)]
    pub user_rating: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OwnerDashboard {
    #[serde(deserialize_with = "lenient_f64")]
    pub average_rating: f64,
    pub ratings: Vec<RatingEntry>,
}

/// One user's rating of the owner's store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RatingEntry {
    pub name: String,
    pub email: String,
    pub rating: u8,
    #[serde(default)]
    pub created_at: String,
}

impl RatingEntry {
    /// Calendar date of the rating, or the raw text if it doesn't parse.
    pub fn date_display(&self) -> String {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.created_at) {
            return ts.date_naive().to_string();
        }
        if let Some(day) = self.created_at.get(..10)
            && let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d")
        {
            return date.to_string();
        }
        self.created_at.clone()
    }
}

/// Five-character star bar for a 0-5 rating, rounded to the nearest star.
pub fn star_bar(rating: f64) -> String {
    let filled = rating.clamp(0.0, 5.0).round() as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

// Postgres AVG() comes back as a string; nulls mean "no ratings yet".
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| serde::de::Error::custom(format!("invalid rating '{s}': {err}"))),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_f64(deserializer)?.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rating_submission_body() {
        let body = serde_json::to_value(RatingSubmission {
            store_id: 42,
            rating: 5,
        })
        .unwrap();
        assert_eq!(body, json!({"storeId": 42, "rating": 5}));
    }

    #[test]
    fn test_new_store_omits_owner_unless_requested() {
        let plain = NewStore {
            name: "Corner Shop".into(),
            email: "shop@test.com".into(),
            address: "1 Main St".into(),
            ..NewStore::default()
        };
        let body = serde_json::to_value(&plain).unwrap();
        assert!(body.get("ownerEmail").is_none());
        assert!(body.get("ownerPassword").is_none());

        let with_owner = NewStore {
            owner_email: Some("o@test.com".into()),
            owner_password: Some("Owner123!".into()),
            ..plain
        };
        let body = serde_json::to_value(&with_owner).unwrap();
        assert_eq!(body["ownerEmail"], "o@test.com");
        assert_eq!(body["ownerPassword"], "Owner123!");
    }

    #[test]
    fn test_password_update_keys() {
        let body = serde_json::to_value(PasswordUpdate {
            current_password: "old".into(),
            new_password: "New123!x".into(),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"currentPassword": "old", "newPassword": "New123!x"})
        );
    }

    #[test]
    fn test_store_rating_accepts_strings_and_nulls() {
        let stores: Vec<Store> = serde_json::from_value(json!([
            {"id": 1, "name": "A", "email": "a@x", "address": "x", "rating": "4.50"},
            {"id": 2, "name": "B", "email": "b@x", "address": "y", "rating": null},
            {"id": 3, "name": "C", "email": "c@x", "address": "z", "rating": 3}
        ]))
        .unwrap();
        assert!((stores[0].rating - 4.5).abs() < f64::EPSILON);
        assert!(stores[1].rating.abs() < f64::EPSILON);
        assert!((stores[2].rating - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_user_rating_display() {
        let owner: User = serde_json::from_value(json!({
            "id": 2, "name": "Owner", "email": "o@x", "address": "a",
            "role": "store_owner", "rating": "3.666"
        }))
        .unwrap();
        let user: User = serde_json::from_value(json!({
            "id": 3, "name": "User", "email": "u@x", "address": "a", "role": "user"
        }))
        .unwrap();

        assert_eq!(owner.rating_display(), "3.7/5");
        assert_eq!(user.rating_display(), "N/A");
    }

    #[test]
    fn test_owner_dashboard_parses() {
        let dash: OwnerDashboard = serde_json::from_value(json!({
            "averageRating": "4.00",
            "ratings": [{
                "name": "Ann", "email": "ann@x", "rating": 4,
                "created_at": "2024-03-09T10:11:12.000Z"
            }]
        }))
        .unwrap();
        assert!((dash.average_rating - 4.0).abs() < f64::EPSILON);
        assert_eq!(dash.ratings[0].date_display(), "2024-03-09");
    }

    #[test]
    fn test_stats_missing_fields_default_to_zero() {
        let stats: DashboardStats = serde_json::from_value(json!({"totalUsers": 7})).unwrap();
        assert_eq!(stats.total_users, 7);
        assert_eq!(stats.total_ratings, 0);
    }

    #[test]
    fn test_listing_without_user_rating() {
        let listing: StoreListing = serde_json::from_value(json!({
            "id": 9, "name": "Deli", "address": "2 Side St", "rating": 2.5, "user_rating": null
        }))
        .unwrap();
        assert_eq!(listing.user_rating, None);
    }

    #[test]
    fn test_star_bar() {
        assert_eq!(star_bar(0.0), "☆☆☆☆☆");
        assert_eq!(star_bar(3.6), "★★★★☆");
        assert_eq!(star_bar(9.0), "★★★★★");
    }
}
