// src/services/mod.rs

pub mod grading;
pub mod submission_service;

pub use submission_service::SubmissionService;
