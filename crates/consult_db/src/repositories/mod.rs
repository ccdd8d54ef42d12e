//! Repositories for the consultation records

pub mod appointment;
pub mod appointment_sql;
pub mod lecturer;
pub mod lecturer_sql;
pub mod student;
pub mod student_sql;

pub use appointment::AppointmentRepository;
pub use appointment_sql::SqlAppointmentRepository;
pub use lecturer::{LecturerProfileUpdate, LecturerRepository};
pub use lecturer_sql::SqlLecturerRepository;
pub use student::{StudentProfileUpdate, StudentRepository};
pub use student_sql::SqlStudentRepository;
