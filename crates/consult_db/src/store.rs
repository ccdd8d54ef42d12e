//! All repositories behind one connection pool

use crate::client::DbClient;
use crate::error::DbError;
use crate::repositories::{
    AppointmentRepository, LecturerRepository, SqlAppointmentRepository, SqlLecturerRepository,
    SqlStudentRepository, StudentRepository,
};
use consult_config::DatabaseConfig;
use tracing::info;

/// The repositories the services work with, sharing one [`DbClient`].
#[derive(Debug, Clone)]
pub struct Store {
    pub students: SqlStudentRepository,
    pub lecturers: SqlLecturerRepository,
    pub appointments: SqlAppointmentRepository,
    client: DbClient,
}

impl Store {
    pub fn new(client: DbClient) -> Self {
        Self {
            students: SqlStudentRepository::new(client.clone()),
            lecturers: SqlLecturerRepository::new(client.clone()),
            appointments: SqlAppointmentRepository::new(client.clone()),
            client,
        }
    }

    /// Connects to the configured database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or the connection fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let client = DbClient::from_config(config).await?;
        Ok(Self::new(client))
    }

    /// Creates every table and index that is missing.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        self.students.init_schema().await?;
        self.lecturers.init_schema().await?;
        self.appointments.init_schema().await?;
        info!("Database schema ready");
        Ok(())
    }

    pub async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }

    pub fn client(&self) -> &DbClient {
        &self.client
    }
}
