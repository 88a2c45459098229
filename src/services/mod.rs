pub mod accounts;
pub mod interactions;
pub mod providers;
pub mod recommendations;
pub mod title_search;
