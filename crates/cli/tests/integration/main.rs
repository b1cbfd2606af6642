mod backup_tests;
mod common;
mod edit_tests;
mod show_tests;
