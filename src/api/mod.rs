/*
 * Responsibility
 * - HTTP 層の公開ポイント (routes() の re-export)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;


pub use routes::routes;
