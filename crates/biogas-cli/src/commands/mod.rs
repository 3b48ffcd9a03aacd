pub mod optimize;
pub mod params;
pub mod potential;
pub mod shares;
pub mod substrates;
pub mod util;
