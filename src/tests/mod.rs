#[cfg(not(feature = "loom"))]
mod correctness;

#[cfg(feature = "loom")]
mod models;
