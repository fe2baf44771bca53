//! filegate core library
//! API path-rewrite proxy, front-end serving and the component manifest

pub mod config;
pub mod components;
pub mod proxy;
