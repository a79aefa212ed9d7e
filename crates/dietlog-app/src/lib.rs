// Application and presentation layers of the diet diary
// Depends on the domain and infrastructure crates

pub mod application;
pub mod presentation;
