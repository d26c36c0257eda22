pub mod analyse;
pub mod extract;
