pub mod push;
pub mod recipes;
