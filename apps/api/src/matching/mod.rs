// Matching engine: salary parsing, match scoring, insights, and the report.
// Pure functions over in-memory postings. No I/O in this module.

pub mod insights;
pub mod report;
pub mod salary;
pub mod scoring;
