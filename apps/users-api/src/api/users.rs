use axum::Router;
use database::DatabaseResult;
use domain_users::{EmbeddedUserRepository, UserService, handlers};

pub fn router(state: &crate::state::AppState) -> DatabaseResult<Router> {
    let repository = EmbeddedUserRepository::new(state.db.clone())?;
    let service = UserService::new(repository);
    Ok(handlers::router(service))
}
