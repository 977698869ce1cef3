pub mod biluo;
pub mod iob;

pub use biluo::{iob_to_biluo, BiluoTag};
pub use iob::{IobTag, ParseTagError};
