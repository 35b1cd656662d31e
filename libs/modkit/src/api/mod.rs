pub mod pagination;
pub mod problem;
pub mod route_table;
