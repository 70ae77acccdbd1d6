pub mod candidates;
pub mod health;
pub mod matches;
pub mod pagination;
pub mod recommendations;
pub mod upskilling;
