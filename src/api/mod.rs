// API routes and handlers

pub mod analysis;
pub mod health;
pub mod middleware;
pub mod routes;
