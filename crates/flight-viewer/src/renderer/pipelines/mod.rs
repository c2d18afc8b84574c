pub mod aircraft;
pub mod path_line;
pub mod sky;
