//! SQL implementation of the appointment repository

use crate::error::DbError;
use crate::repositories::appointment::AppointmentRepository;
use crate::DbClient;
use consult_common::Appointment;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

const APPOINTMENT_COLUMNS: &str = "id, student_id, lecturer_id, slot_date, slot_time, student_data, lecturer_data, date, cancelled, is_completed";

/// SQL implementation of the appointment repository
#[derive(Debug, Clone)]
pub struct SqlAppointmentRepository {
    db_client: DbClient,
}

impl SqlAppointmentRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn map_row(row: &AnyRow) -> Result<Appointment, DbError> {
        let student_data: String = row.try_get("student_data")?;
        let lecturer_data: String = row.try_get("lecturer_data")?;
        let cancelled: i64 = row.try_get("cancelled")?;
        let is_completed: i64 = row.try_get("is_completed")?;
        Ok(Appointment {
            id: row.try_get("id")?,
            student_id: row.try_get("student_id")?,
            lecturer_id: row.try_get("lecturer_id")?,
            slot_date: row.try_get("slot_date")?,
            slot_time: row.try_get("slot_time")?,
            student_data: serde_json::from_str(&student_data)?,
            lecturer_data: serde_json::from_str(&lecturer_data)?,
            date: row.try_get("date")?,
            cancelled: cancelled != 0,
            is_completed: is_completed != 0,
        })
    }

    async fn find_many(&self, column: &str, value: &str) -> Result<Vec<Appointment>, DbError> {
        let query = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE {column} = $1 ORDER BY date ASC, id ASC"
        );

        let rows = sqlx::query(&query)
            .bind(value)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list appointments by {}: {}", column, e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn transition(&self, query: &str, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query(query)
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to update appointment {}: {}", id, e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }
}

impl AppointmentRepository for SqlAppointmentRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing appointment schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS appointments (
                id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL,
                lecturer_id TEXT NOT NULL,
                slot_date TEXT NOT NULL,
                slot_time TEXT NOT NULL,
                student_data TEXT NOT NULL,
                lecturer_data TEXT NOT NULL,
                date BIGINT NOT NULL,
                cancelled BIGINT NOT NULL DEFAULT 0,
                is_completed BIGINT NOT NULL DEFAULT 0
            )
        "#;
        self.db_client.execute(query).await?;

        self.db_client
            .execute("CREATE INDEX IF NOT EXISTS idx_appointments_student ON appointments (student_id)")
            .await?;
        self.db_client
            .execute("CREATE INDEX IF NOT EXISTS idx_appointments_lecturer ON appointments (lecturer_id)")
            .await?;

        info!("Appointment schema initialized successfully");
        Ok(())
    }

    async fn create(&self, appointment: &Appointment) -> Result<(), DbError> {
        debug!(
            "Creating appointment {} for student {} with lecturer {}",
            appointment.id, appointment.student_id, appointment.lecturer_id
        );

        let query = r#"
            INSERT INTO appointments (id, student_id, lecturer_id, slot_date, slot_time, student_data, lecturer_data, date, cancelled, is_completed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#;

        sqlx::query(query)
            .bind(&appointment.id)
            .bind(&appointment.student_id)
            .bind(&appointment.lecturer_id)
            .bind(&appointment.slot_date)
            .bind(&appointment.slot_time)
            .bind(serde_json::to_string(&appointment.student_data)?)
            .bind(serde_json::to_string(&appointment.lecturer_data)?)
            .bind(appointment.date)
            .bind(i64::from(appointment.cancelled))
            .bind(i64::from(appointment.is_completed))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_write(e, "Appointment"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, DbError> {
        let query = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find appointment: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_by_student(&self, student_id: &str) -> Result<Vec<Appointment>, DbError> {
        self.find_many("student_id", student_id).await
    }

    async fn find_by_lecturer(&self, lecturer_id: &str) -> Result<Vec<Appointment>, DbError> {
        self.find_many("lecturer_id", lecturer_id).await
    }

    async fn mark_cancelled(&self, id: &str) -> Result<bool, DbError> {
        self.transition(
            "UPDATE appointments SET cancelled = 1 WHERE id = $1 AND cancelled = 0 AND is_completed = 0",
            id,
        )
        .await
    }

    async fn mark_completed(&self, id: &str) -> Result<bool, DbError> {
        self.transition(
            "UPDATE appointments SET is_completed = 1 WHERE id = $1 AND cancelled = 0 AND is_completed = 0",
            id,
        )
        .await
    }
}
