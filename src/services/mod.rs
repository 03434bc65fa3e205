pub mod account_service;
pub mod dataset_service;
pub mod health_service;
