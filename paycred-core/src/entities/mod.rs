pub mod config_data;
