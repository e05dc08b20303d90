pub mod builders;
pub mod report;
pub mod services;
