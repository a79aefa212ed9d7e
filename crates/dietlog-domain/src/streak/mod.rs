mod aggregate;
mod domain_service;
mod repository;


pub use aggregate::{StreakRecord, StreakState};
pub use domain_service::{StreakDomainService, StreakTransition};
pub use repository::StreakRepository;
