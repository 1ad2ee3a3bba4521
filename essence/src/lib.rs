pub mod capture;
pub mod positioning;
pub mod recognition;
pub mod system_control;
pub mod utils;
pub mod window_info;
