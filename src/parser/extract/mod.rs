pub mod points;
pub mod profile;
pub mod program;
pub mod rank;
pub mod seasons;
pub mod teams;
