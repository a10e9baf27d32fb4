pub mod document;
pub mod home;
pub mod not_found;
