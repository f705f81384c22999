pub mod addr;
pub mod coord;
pub mod equation;
pub mod info;
pub mod modes;
