mod maths_utils;
mod time_utils;

pub use maths_utils::{dynamic_precision, max_bars_on_screen, remap};
pub use time_utils::{epoch_s_to_date_string, epoch_s_to_time_string};
