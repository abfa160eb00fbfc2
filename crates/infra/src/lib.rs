pub mod batch;
pub mod db;
pub mod models;
pub mod pagination;
pub mod repos;
pub mod search;
pub mod soft_delete;
