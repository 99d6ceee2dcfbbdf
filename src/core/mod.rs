// Core helpers shared by the engine and the demos

pub mod math;
