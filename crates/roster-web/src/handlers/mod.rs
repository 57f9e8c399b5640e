pub mod create_sheet;
pub mod health;
