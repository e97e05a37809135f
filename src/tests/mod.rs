mod test_builder;
mod test_params;
mod test_ranking;

use crate::params::PipelineParams;

/// Test logger: output captured per test, `RUST_LOG` respected.
pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Reference scenario: A and B share their two readers, C is read by the
/// third user only (phi(A,C) = phi(B,C) = -1).
pub const ABC_LINES: [&str; 5] = ["u1:A", "u2:A", "u1:B", "u2:B", "u3:C"];

/// X and Y share their readers, Z is read by every user so every pair with Z
/// has a zero marginal.
pub const XYZ_LINES: [&str; 7] = ["u1:X", "u2:X", "u1:Y", "u2:Y", "u1:Z", "u2:Z", "u3:Z"];

/// Four items over four users with phi values of 1, 0 and -1:
/// W = {u1,u3}, X = {u1,u2}, Y = {u1,u2}, Z = {u3,u4}
pub const WXYZ_LINES: [&str; 8] = [
    "u1:W", "u3:W", "u1:X", "u2:X", "u1:Y", "u2:Y", "u3:Z", "u4:Z",
];

pub fn default_params() -> PipelineParams {
    PipelineParams::default()
}
