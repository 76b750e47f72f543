//! Postgres-backed [`ProfileStore`].

use sqlx::{FromRow, PgPool};
use store::{Profile, ProfileStore, StoreError, UserId};

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: String,
    role: String,
    name: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: UserId(row.id),
            role: row.role,
            name: row.name,
        }
    }
}

/// Profiles stored in the `profiles` table. The primary key on `id` enforces the
/// one-profile-per-identity invariant.
#[derive(Clone, Debug)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the profile with this id, if any.
    pub async fn fetch(&self, id: &UserId) -> Result<Option<Profile>, StoreError> {
        let row: Option<ProfileRow> =
            sqlx::query_as("SELECT id, role, name FROM profiles WHERE id = $1 LIMIT 1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(unavailable)?;

        Ok(row.map(Profile::from))
    }

    /// Insert `profile`, leaving an existing row untouched.
    pub async fn create(&self, profile: Profile) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO profiles (id, role, name) VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING",
        )
        .bind(profile.id.as_str())
        .bind(&profile.role)
        .bind(&profile.name)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::DuplicateKey(profile.id));
        }
        Ok(())
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    tracing::error!("Profile query failed: {}", e);
    StoreError::Unavailable(e.to_string())
}

impl ProfileStore for PgProfileStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Profile>, StoreError> {
        self.fetch(id).await
    }

    async fn insert(&self, profile: Profile) -> Result<(), StoreError> {
        self.create(profile).await
    }
}
