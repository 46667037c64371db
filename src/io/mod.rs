pub mod csv_export;
pub mod periods;
pub mod store;
