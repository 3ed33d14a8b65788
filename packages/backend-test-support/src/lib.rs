//! Helpers shared by the backend's integration tests: one-time logging
//! setup and assertions on the problem-details error contract.

pub mod logging;
pub mod problem_details;

pub use problem_details::{assert_problem, ProblemDetails};
