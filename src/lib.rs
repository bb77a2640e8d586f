#![doc = "The `taskhub` library crate."]
#![doc = ""]
#![doc = "A minimal multi-user task tracker: registration and login with"]
#![doc = "role-based access (USER/ADMIN) and CRUD on per-user tasks, served"]
#![doc = "as JSON over HTTP. The binary (`main.rs`) wires the pieces declared"]
#![doc = "here into an actix-web application."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
