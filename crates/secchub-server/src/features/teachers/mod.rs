//! Teacher management
//!
//! Registration, lookup, workload updates and removal of teachers.
//!
//! # Structure
//!
//! - `types.rs` - Requests, the [`Teacher`] record and [`TeacherError`]
//! - `service.rs` - [`TeacherService`], audited as `TeacherService.<operation>`
//! - `operations.rs` - One audited operation per service method
//! - `routes.rs` - HTTP handlers

pub mod operations;
pub mod routes;
pub mod service;
pub mod types;

pub use operations::{CreateTeacher, DeleteTeacher, FindTeacher, ListTeachers, UpdateTeacher};
pub use routes::teachers_routes;
pub use service::TeacherService;
pub use types::{CreateTeacherRequest, Teacher, TeacherError, UpdateTeacherRequest};
