pub mod client;
pub mod shapes;
