pub mod expand;
pub mod natural;
pub mod parse;
