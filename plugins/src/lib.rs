pub mod factory;
pub mod history;
pub mod live;
pub mod loader;
pub mod model;
pub mod page;
pub mod parser;
pub mod view;
