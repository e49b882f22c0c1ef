pub mod network_backdrop;
