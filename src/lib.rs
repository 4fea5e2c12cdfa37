pub mod app;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod extent;
pub mod layers;
pub mod merge;
pub mod theme;
pub mod xml;
