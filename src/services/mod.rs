//! Business logic services

pub mod catalog;
pub mod leases;
pub mod reports;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub leases: leases::LeasesService,
    pub users: users::UsersService,
    pub reports: reports::ReportsService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            leases: leases::LeasesService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), auth_config),
            reports: reports::ReportsService::new(repository.clone()),
            repository,
        }
    }
}
