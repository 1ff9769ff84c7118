pub mod access;
pub mod menu;
pub mod pages;
pub mod session;
pub mod system;
