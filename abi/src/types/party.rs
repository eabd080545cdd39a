use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{FarmerId, OperatorId, UserId};

/// account-to-domain link for the booking side; owned by the auth/profile
/// services, read-only here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Farmer {
    pub id: FarmerId,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Operator {
    pub id: OperatorId,
    pub user_id: UserId,
    pub business_name: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
