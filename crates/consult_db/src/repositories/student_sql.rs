//! SQL implementation of the student repository

use crate::error::DbError;
use crate::repositories::student::{StudentProfileUpdate, StudentRepository};
use crate::DbClient;
use consult_common::{now_millis, Address, Student};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

const STUDENT_COLUMNS: &str = "id, name, email, password, image, phone, address, gender, dob";

/// SQL implementation of the student repository
#[derive(Debug, Clone)]
pub struct SqlStudentRepository {
    db_client: DbClient,
}

impl SqlStudentRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn map_row(row: &AnyRow) -> Result<Student, DbError> {
        let address: String = row.try_get("address")?;
        Ok(Student {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            image: row.try_get("image")?,
            phone: row.try_get("phone")?,
            address: serde_json::from_str::<Address>(&address)?,
            gender: row.try_get("gender")?,
            dob: row.try_get("dob")?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Student>, DbError> {
        let query = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE {column} = $1");

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find student by {}: {}", column, e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(Self::map_row).transpose()
    }
}

impl StudentRepository for SqlStudentRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing student schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS students (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                image TEXT NOT NULL,
                phone TEXT NOT NULL,
                address TEXT NOT NULL,
                gender TEXT NOT NULL,
                dob TEXT NOT NULL,
                created_at BIGINT NOT NULL
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Student schema initialized successfully");
        Ok(())
    }

    async fn create(&self, student: &Student) -> Result<(), DbError> {
        debug!("Creating student {}", student.id);

        let query = r#"
            INSERT INTO students (id, name, email, password, image, phone, address, gender, dob, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#;

        sqlx::query(query)
            .bind(&student.id)
            .bind(&student.name)
            .bind(&student.email)
            .bind(&student.password)
            .bind(&student.image)
            .bind(&student.phone)
            .bind(serde_json::to_string(&student.address)?)
            .bind(&student.gender)
            .bind(&student.dob)
            .bind(now_millis())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_write(e, "Student"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Student>, DbError> {
        self.find_one("id", id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DbError> {
        self.find_one("email", email).await
    }

    async fn update_profile(&self, id: &str, update: &StudentProfileUpdate) -> Result<bool, DbError> {
        debug!("Updating profile of student {}", id);

        let result = match &update.address {
            Some(address) => {
                sqlx::query(
                    "UPDATE students SET name = $1, phone = $2, dob = $3, gender = $4, address = $5 WHERE id = $6",
                )
                .bind(&update.name)
                .bind(&update.phone)
                .bind(&update.dob)
                .bind(&update.gender)
                .bind(serde_json::to_string(address)?)
                .bind(id)
                .execute(self.db_client.pool())
                .await
            }
            None => {
                sqlx::query(
                    "UPDATE students SET name = $1, phone = $2, dob = $3, gender = $4 WHERE id = $5",
                )
                .bind(&update.name)
                .bind(&update.phone)
                .bind(&update.dob)
                .bind(&update.gender)
                .bind(id)
                .execute(self.db_client.pool())
                .await
            }
        }
        .map_err(|e| {
            error!("Failed to update student profile: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(result.rows_affected() > 0)
    }
}
