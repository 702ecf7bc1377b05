pub mod assets;
pub mod config;
pub mod dto;
pub mod email;
pub mod error;
pub mod middleware;
pub mod models;
pub mod payment;
pub mod response;
pub mod routes;
pub mod services;
pub mod slug;
pub mod state;
pub mod store;
