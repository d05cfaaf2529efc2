//! Command line front end for the Fire Emblem Three Houses text containers

pub mod commands;
pub mod escape;
