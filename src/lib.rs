pub mod assets;
pub mod config;
pub mod context;
pub mod errors;
pub mod icons;
pub mod index;
pub mod modifiers;
pub mod resolution;
pub mod rewrite;
pub mod scan;
pub mod search;
pub mod session;
pub mod types;
