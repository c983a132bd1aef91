pub mod dashboard;
pub mod init;
pub mod login;
pub mod prompt;
pub mod users;
