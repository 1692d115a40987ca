pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod generators;
pub mod maze;
pub mod player;
pub mod solvers;
