pub mod parser;

pub use parser::{COLORS, PRODUCTS, parse};
