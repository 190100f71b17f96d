pub mod entry;
pub mod expense;
pub mod goal;
pub mod history;
pub mod lenient;
pub mod month;
pub mod ride;
pub mod state;
pub mod summary;
pub mod transfer;
