pub use essence_scanner::*;

mod essence_scanner;
