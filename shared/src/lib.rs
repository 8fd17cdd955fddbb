pub mod constants;
pub mod shared_wheel_game;
pub mod spin_flow;
pub mod wheel_motion;
