pub mod api;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod metadata;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;
