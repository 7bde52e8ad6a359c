mod doctor;
mod provision;

pub use doctor::cmd_doctor;
pub use provision::cmd_provision;
