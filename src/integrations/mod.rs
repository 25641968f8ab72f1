pub mod calendar;
pub mod login;
