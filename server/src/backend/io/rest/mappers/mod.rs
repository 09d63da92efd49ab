pub mod routine_mapper;
pub mod user_mapper;
