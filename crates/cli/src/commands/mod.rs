pub mod auth;
pub mod classrooms;
pub mod courses;
pub mod orders;
pub mod request;
pub mod site;
pub mod utils;
