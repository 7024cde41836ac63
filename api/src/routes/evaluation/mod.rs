pub mod evaluation_request;
pub mod evaluation_route;
