pub mod dialogs;
pub mod ui;
