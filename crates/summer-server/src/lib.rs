//! HTTP relay server — routes, DTOs, and OpenAPI documentation.

pub mod dto;
pub mod openapi;
pub mod routes;
pub mod state;
