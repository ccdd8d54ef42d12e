//! SQL implementation of the lecturer repository

use crate::error::DbError;
use crate::repositories::lecturer::{LecturerProfileUpdate, LecturerRepository};
use crate::DbClient;
use consult_common::{Address, Lecturer, SlotMap};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

const LECTURER_COLUMNS: &str = "id, name, email, password, image, speciality, degree, experience, about, available, slots_booked, address, date";

/// SQL implementation of the lecturer repository
#[derive(Debug, Clone)]
pub struct SqlLecturerRepository {
    db_client: DbClient,
}

impl SqlLecturerRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn map_row(row: &AnyRow) -> Result<Lecturer, DbError> {
        let slots_booked: String = row.try_get("slots_booked")?;
        let address: String = row.try_get("address")?;
        let available: i64 = row.try_get("available")?;
        Ok(Lecturer {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            image: row.try_get("image")?,
            speciality: row.try_get("speciality")?,
            degree: row.try_get("degree")?,
            experience: row.try_get("experience")?,
            about: row.try_get("about")?,
            available: available != 0,
            slots_booked: serde_json::from_str::<SlotMap>(&slots_booked)?,
            address: serde_json::from_str::<Address>(&address)?,
            date: row.try_get("date")?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Lecturer>, DbError> {
        let query = format!("SELECT {LECTURER_COLUMNS} FROM lecturers WHERE {column} = $1");

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find lecturer by {}: {}", column, e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(Self::map_row).transpose()
    }
}

impl LecturerRepository for SqlLecturerRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing lecturer schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS lecturers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                image TEXT NOT NULL,
                speciality TEXT NOT NULL,
                degree TEXT NOT NULL,
                experience TEXT NOT NULL,
                about TEXT NOT NULL,
                available BIGINT NOT NULL,
                slots_booked TEXT NOT NULL,
                address TEXT NOT NULL,
                date BIGINT NOT NULL
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Lecturer schema initialized successfully");
        Ok(())
    }

    async fn create(&self, lecturer: &Lecturer) -> Result<(), DbError> {
        debug!("Creating lecturer {}", lecturer.id);

        let query = r#"
            INSERT INTO lecturers (id, name, email, password, image, speciality, degree, experience, about, available, slots_booked, address, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#;

        sqlx::query(query)
            .bind(&lecturer.id)
            .bind(&lecturer.name)
            .bind(&lecturer.email)
            .bind(&lecturer.password)
            .bind(&lecturer.image)
            .bind(&lecturer.speciality)
            .bind(&lecturer.degree)
            .bind(&lecturer.experience)
            .bind(&lecturer.about)
            .bind(i64::from(lecturer.available))
            .bind(serde_json::to_string(&lecturer.slots_booked)?)
            .bind(serde_json::to_string(&lecturer.address)?)
            .bind(lecturer.date)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_write(e, "Lecturer"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Lecturer>, DbError> {
        self.find_one("id", id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Lecturer>, DbError> {
        self.find_one("email", email).await
    }

    async fn find_all(&self) -> Result<Vec<Lecturer>, DbError> {
        debug!("Finding all lecturers");

        let query = format!("SELECT {LECTURER_COLUMNS} FROM lecturers ORDER BY date, id");

        let rows = sqlx::query(&query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list lecturers: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn toggle_available(&self, id: &str) -> Result<bool, DbError> {
        debug!("Toggling availability of lecturer {}", id);

        let result = sqlx::query("UPDATE lecturers SET available = 1 - available WHERE id = $1")
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to toggle lecturer availability: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &LecturerProfileUpdate,
    ) -> Result<bool, DbError> {
        debug!("Updating profile of lecturer {}", id);

        // NULL binds leave the column as it is, so a concurrent availability
        // toggle is not overwritten by a request that did not mention it.
        let query = r#"
            UPDATE lecturers
            SET address = COALESCE($1, address),
                available = COALESCE($2, available),
                speciality = COALESCE($3, speciality),
                degree = COALESCE($4, degree),
                experience = COALESCE($5, experience),
                about = COALESCE($6, about)
            WHERE id = $7
        "#;

        let address = update
            .address
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(query)
            .bind(address)
            .bind(update.available.map(i64::from))
            .bind(update.speciality.clone())
            .bind(update.degree.clone())
            .bind(update.experience.clone())
            .bind(update.about.clone())
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to update lecturer profile: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_slots(
        &self,
        id: &str,
        expected: &SlotMap,
        new: &SlotMap,
    ) -> Result<bool, DbError> {
        // Slot maps are always written through serde_json, so equal maps
        // have equal text and the comparison can happen in SQL.
        let result = sqlx::query(
            "UPDATE lecturers SET slots_booked = $1 WHERE id = $2 AND slots_booked = $3",
        )
        .bind(serde_json::to_string(new)?)
        .bind(id)
        .bind(serde_json::to_string(expected)?)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to write lecturer slots: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(result.rows_affected() > 0)
    }
}
