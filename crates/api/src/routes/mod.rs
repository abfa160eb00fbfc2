pub mod callback;
pub mod vegetables;
