pub mod bugs;
pub mod categories;
pub mod ideas;
pub mod session;
