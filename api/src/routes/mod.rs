pub mod chat;
pub mod evaluation;
pub mod health_route;
pub mod root_route;
